fn main() {
    balance_cli::cli::run();
}
