//! Demonstrates building the reference English grammar and serializing it.
//!
//! Run with: `RUST_LOG=debug cargo run --example dump_grammar -p asdl-grammar`

fn main() {
    env_logger::init();

    let grammar = match asdl_grammar::english::grammar() {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("invalid grammar: {e}");
            std::process::exit(1);
        }
    };

    println!("ASDL grammar rooted at {}", grammar.root_type());
    println!("  Productions:  {}", grammar.size());
    println!("  Types:        {}", grammar.types().len());
    println!("  Fields:       {}", grammar.fields().len());
    println!();

    // Id tables as a decoder sees them.
    for (id, prod) in grammar.productions().iter().enumerate() {
        println!("  prod  {id:>3}  {:12} {}", prod.ty(), prod.constructor());
    }
    for (id, ty) in grammar.types().iter().enumerate() {
        println!("  type  {id:>3}  {:12} [{}]", ty.name(), ty.kind().as_str());
    }
    for (id, field) in grammar.fields().iter().enumerate() {
        println!("  field {id:>3}  {:12} {}", field.name(), field);
    }
    println!();

    print!("{}", asdl_grammar::serializer::text::to_asdl_text(&grammar));
    println!();

    let json = asdl_grammar::serializer::json::to_string_pretty(&grammar)
        .unwrap_or_else(|e| format!("JSON error: {e}"));
    println!("JSON output ({} bytes)", json.len());
}
