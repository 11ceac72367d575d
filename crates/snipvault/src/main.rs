fn main() {
    snipvault_cli::run_main();
}
