fn main() {
    if let Err(err) = incentive_batch::run() {
        eprintln!("batch error: {err}");
        std::process::exit(1);
    }
}
