use crate::model::LoadedModel;
use std::path::Path;
use tracing::info;

pub fn run(
    model: &Path,
    share: bool,
    path: &str,
    name: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let loaded = LoadedModel::load(model, share)?;
    render(&loaded, path, name, json)
}

fn render(
    loaded: &LoadedModel,
    path: &str,
    name: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let decl = loaded.resolve(path)?;
    let Some(variable) = loaded.factory.scope_for(decl).lookup(name) else {
        return Err(format!("Type variable '{}' is not in scope at {}", name, path).into());
    };
    info!("Resolved '{}' at {} to {}", name, path, variable.owner);

    if json {
        return Ok(serde_json::to_string_pretty(&variable)?);
    }
    let bounds: Vec<String> = variable.bounds.iter().map(ToString::to_string).collect();
    Ok(format!(
        "{} declared by {} {} (index {}), bounds: {}",
        variable.name,
        variable.owner.kind_name(),
        loaded.describe(variable.owner),
        variable.index,
        bounds.join(" & ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MODEL, model_file};

    #[test]
    fn given_local_class_when_resolving_outer_variable_then_reports_owner() {
        let file = model_file(MODEL);
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        let out = render(&loaded, "Outer#map.Local", "T", false).unwrap();
        assert_eq!(
            out,
            "T declared by class Outer (index 0), bounds: java.lang.Number"
        );
    }

    #[test]
    fn given_json_flag_then_prints_variable_as_json() {
        let file = model_file(MODEL);
        let loaded = LoadedModel::load(file.path(), false).unwrap();
        let out = render(&loaded, "Outer#map.Local", "R", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "R");
        assert_eq!(value["owner"]["kind"], "method");
    }

    #[test]
    fn given_unknown_name_then_error() {
        let file = model_file(MODEL);
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        assert!(render(&loaded, "Outer", "R", false).is_err());
        assert!(render(&loaded, "Nope", "T", false).is_err());
    }
}
