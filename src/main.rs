fn main() {
    if let Err(err) = archboard::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
