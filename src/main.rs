fn main() {
    if let Err(e) = cu_report::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(cu_report::exit_code(&e));
    }
}
