fn main() {
    // Every failure maps to exit code 1; clap handles usage errors itself.
    if let Err(err) = sfca_gate::cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
