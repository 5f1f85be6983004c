use quotecard::cli::Cli;

fn main() {
    Cli::run();
}
