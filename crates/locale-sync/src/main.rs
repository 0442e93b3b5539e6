fn main() {
    let code = locale_sync_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
