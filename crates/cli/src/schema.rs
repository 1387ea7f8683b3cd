use genscope_core::model::model_schema;

pub fn run() -> Result<String, Box<dyn std::error::Error>> {
    Ok(serde_json::to_string_pretty(&model_schema())?)
}
