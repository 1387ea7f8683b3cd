fn main() -> Result<(), Box<dyn std::error::Error>> {
    genscope_cli::run()
}
