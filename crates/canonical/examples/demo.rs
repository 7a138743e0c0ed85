use canonical::{AbbreviationRule, Normalizer, NormalizerConfig};
use std::env;

fn main() -> Result<(), canonical::CanonicalError> {
    let cfg = NormalizerConfig {
        extra_rules: vec![AbbreviationRule::new("nos.", "nos")],
        ..Default::default()
    };
    let normalizer = Normalizer::new(&cfg)?;

    let inputs: Vec<String> = env::args().skip(1).collect();
    let inputs = if inputs.is_empty() {
        vec![
            "  Steel Rebar   12MM. ".to_string(),
            "Reinforced Cement Concrete M25 slab".to_string(),
            "Door frame 2 NOS.".to_string(),
        ]
    } else {
        inputs
    };

    for raw in &inputs {
        println!("{raw:?} -> {:?}", normalizer.normalize(raw));
    }
    println!();
    println!("rules (v{}): {}", normalizer.version(), normalizer.table().len());
    Ok(())
}
