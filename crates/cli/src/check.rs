use crate::model::LoadedModel;
use genscope_core::GenericRepository;
use std::collections::HashSet;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};
use tracing::{info, warn};

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Declaration")]
    declaration: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Error")]
    error: String,
}

pub fn run(model: &Path, share: bool) -> Result<String, Box<dyn std::error::Error>> {
    let loaded = LoadedModel::load(model, share)?;
    render(&loaded)
}

fn render(loaded: &LoadedModel) -> Result<String, Box<dyn std::error::Error>> {
    let repository = GenericRepository::new(loaded.factory.clone());
    let failures = repository.verify(loaded.table.declarations());

    if failures.is_empty() {
        info!("All {} declarations bind cleanly", loaded.table.len());
        return Ok(format!(
            "OK: {} declarations checked",
            loaded.table.len()
        ));
    }

    let rows: Vec<FailureRow> = failures
        .iter()
        .map(|(decl, error)| FailureRow {
            declaration: loaded.describe(*decl),
            kind: decl.kind_name(),
            error: error.to_string(),
        })
        .collect();
    let failed: HashSet<_> = failures.iter().map(|(decl, _)| *decl).collect();
    warn!(
        "{} signature failures in {} declarations",
        rows.len(),
        failed.len()
    );
    eprintln!("{}", Table::new(&rows).with(Style::psql()));
    Err(format!(
        "{} of {} declarations failed to bind",
        failed.len(),
        loaded.table.len()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MODEL, model_file};

    #[test]
    fn test_clean_model_passes() {
        let file = model_file(MODEL);
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        assert_eq!(render(&loaded).unwrap(), "OK: 3 declarations checked");
    }

    #[test]
    fn test_unresolved_variable_fails_check() {
        let file = model_file(
            r#"{ "classes": [ { "name": "Broken",
                 "methods": [ { "name": "get", "signature": "()TQ;" } ] } ] }"#,
        );
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        let err = render(&loaded).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 declarations failed to bind");
    }

    #[test]
    fn test_several_failing_bounds_count_one_declaration() {
        let file = model_file(
            r#"{ "classes": [ { "name": "One",
                 "signature": "<A:Ljava/util/List<TQ;>;B:Ljava/util/Set<TQ;>;>Ljava/lang/Object;" } ] }"#,
        );
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        let repository = GenericRepository::new(loaded.factory.clone());
        assert_eq!(repository.verify(loaded.table.declarations()).len(), 2);

        let err = render(&loaded).unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 declarations failed to bind");
    }
}
