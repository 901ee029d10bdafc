fn main() {
    if let Err(e) = tsuml_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
