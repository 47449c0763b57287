use ef_query::parse;

fn main() {
    pretty_env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <search query>", args[0]);
        std::process::exit(1);
    }
    let parsed = parse(&args[1]);
    match serde_json::to_string_pretty(&parsed) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing parsed query: {}", e);
            std::process::exit(1);
        }
    }
}
