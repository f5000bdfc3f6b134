fn main() {
    if let Err(err) = slidekit::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
