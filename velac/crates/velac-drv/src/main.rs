fn main() {
    if let Err(e) = velac_drv::main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
