use std::fs;

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    // Page geometry must leave room to draw
    let page = table
        .get("page")
        .and_then(|v| v.as_table())
        .expect("default_config.toml is missing [page]");
    let dimension = |key: &str| {
        page.get(key)
            .and_then(|v| v.as_float())
            .unwrap_or_else(|| panic!("[page].{} must be a float", key))
    };
    let margin = dimension("margin_mm");
    if dimension("width_mm") <= 2.0 * margin || dimension("height_mm") <= 2.0 * margin {
        panic!("[page] margins leave no drawable area");
    }
}
