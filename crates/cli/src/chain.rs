use crate::model::LoadedModel;
use genscope_core::Scope;
use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled, Serialize)]
struct ChainRow {
    #[tabled(rename = "Depth")]
    depth: usize,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Declaration")]
    declaration: String,
    #[tabled(rename = "Type Parameters")]
    type_parameters: String,
}

pub fn run(
    model: &Path,
    share: bool,
    path: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let loaded = LoadedModel::load(model, share)?;
    render(&loaded, path, json)
}

fn render(
    loaded: &LoadedModel,
    path: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let decl = loaded.resolve(path)?;
    let scope = loaded.factory.scope_for(decl);
    let rows: Vec<ChainRow> = scope
        .chain()
        .enumerate()
        .map(|(depth, link)| row(loaded, depth, link))
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    Ok(Table::new(&rows).with(Style::psql()).to_string())
}

fn row(loaded: &LoadedModel, depth: usize, scope: &Scope) -> ChainRow {
    match scope {
        Scope::Terminal => ChainRow {
            depth,
            kind: "terminal",
            declaration: "-".to_string(),
            type_parameters: "-".to_string(),
        },
        Scope::Declaration(inner) => {
            let decl = inner.declaration();
            let params: Vec<&str> = inner
                .type_parameters()
                .iter()
                .map(|tv| tv.name.as_str())
                .collect();
            ChainRow {
                depth,
                kind: decl.kind_name(),
                declaration: loaded.describe(decl),
                type_parameters: if params.is_empty() {
                    "-".to_string()
                } else {
                    params.join(", ")
                },
            }
        }
    }
}
