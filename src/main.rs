fn main() {
    if let Err(err) = schema_tools::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
