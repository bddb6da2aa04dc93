fn main() {
    if let Err(err) = dataflow_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
