use crate::SignatureKind;
use crate::model::LoadedModel;
use genscope_api::{DeclarationReader, FormalTypeParameter, GenericDecl, TypeRef};
use genscope_core::SignatureError;
use genscope_core::signature::{
    SignatureBinder, parse_class_signature, parse_field_signature, parse_method_signature,
};
use std::path::Path;

/// Method and class signatures describe the declaration at `PATH` itself, so
/// the declaration must be of that kind and its formal type parameters must be
/// the ones the declaration declares, in order. Binding then uses the
/// declaration's own type variables.
fn check_declares(
    loaded: &LoadedModel,
    path: &str,
    decl: GenericDecl,
    kind: SignatureKind,
    params: &[FormalTypeParameter],
) -> Result<(), Box<dyn std::error::Error>> {
    let kind_matches = match kind {
        SignatureKind::Method => !matches!(decl, GenericDecl::Class(_)),
        SignatureKind::Class => matches!(decl, GenericDecl::Class(_)),
        SignatureKind::Field => true,
    };
    if !kind_matches {
        return Err(SignatureError::WrongDeclarationKind {
            decl,
            expected: match kind {
                SignatureKind::Class => "class",
                _ => "method or constructor",
            },
            actual: decl.kind_name(),
        }
        .into());
    }

    let declared: Vec<&str> = loaded
        .table
        .type_parameters(decl)
        .iter()
        .map(|tv| tv.name.as_str())
        .collect();
    let given: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    if declared != given {
        return Err(format!(
            "{} declares type parameters <{}>, signature introduces <{}>",
            path,
            declared.join(", "),
            given.join(", ")
        )
        .into());
    }
    Ok(())
}

pub fn run(
    model: &Path,
    share: bool,
    path: &str,
    signature: &str,
    kind: SignatureKind,
) -> Result<String, Box<dyn std::error::Error>> {
    let loaded = LoadedModel::load(model, share)?;
    render(&loaded, path, signature, kind)
}

fn render(
    loaded: &LoadedModel,
    path: &str,
    signature: &str,
    kind: SignatureKind,
) -> Result<String, Box<dyn std::error::Error>> {
    let decl = loaded.resolve(path)?;
    let scope = loaded.factory.scope_for(decl);

    let lines = match kind {
        SignatureKind::Field => {
            let parsed = parse_field_signature(signature)?;
            vec![SignatureBinder::new(&scope).bind_type(&parsed)?.to_string()]
        }
        SignatureKind::Method => {
            let parsed = parse_method_signature(signature)?;
            check_declares(loaded, path, decl, kind, &parsed.type_parameters)?;
            let bound = SignatureBinder::new(&scope).bind_method(&parsed)?;
            vec![
                format!("parameters: {}", join(&bound.parameters)),
                format!("returns: {}", bound.return_type),
                format!("throws: {}", join(&bound.exceptions)),
            ]
        }
        SignatureKind::Class => {
            let parsed = parse_class_signature(signature)?;
            check_declares(loaded, path, decl, kind, &parsed.type_parameters)?;
            let bound = SignatureBinder::new(&scope).bind_class(&parsed)?;
            vec![
                format!("extends: {}", bound.superclass),
                format!("implements: {}", join(&bound.interfaces)),
            ]
        }
    };
    Ok(lines.join("\n"))
}

fn join(types: &[TypeRef]) -> String {
    if types.is_empty() {
        return "-".to_string();
    }
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MODEL, model_file};

    fn loaded() -> (tempfile::NamedTempFile, LoadedModel) {
        let file = model_file(MODEL);
        let loaded = LoadedModel::load(file.path(), true).unwrap();
        (file, loaded)
    }

    #[test]
    fn test_field_signature_binds_enclosing_variables() {
        let (_file, loaded) = loaded();
        let out = render(
            &loaded,
            "Outer#map.Local",
            "Ljava/util/Map<TT;TL;>;",
            SignatureKind::Field,
        )
        .unwrap();
        assert_eq!(out, "java.util.Map<T, L>");
    }

    #[test]
    fn test_method_signature_binds_declared_parameters() {
        let (_file, loaded) = loaded();
        let out = render(
            &loaded,
            "Outer#map",
            "<R:Ljava/lang/Object;>(TT;[TR;)TR;",
            SignatureKind::Method,
        )
        .unwrap();
        assert_eq!(out, "parameters: T, R[]\nreturns: R\nthrows: -");
    }

    #[test]
    fn test_method_signature_on_class_is_rejected() {
        let (_file, loaded) = loaded();
        let err = render(
            &loaded,
            "Outer",
            "<X:Ljava/lang/Object;>(TX;)TX;",
            SignatureKind::Method,
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected a method or constructor"));
    }

    #[test]
    fn test_undeclared_signature_parameters_are_rejected() {
        let (_file, loaded) = loaded();
        let err = render(
            &loaded,
            "Outer#map",
            "<X:Ljava/lang/Object;>(TX;)TX;",
            SignatureKind::Method,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Outer#map declares type parameters <R>, signature introduces <X>"
        );

        let err = render(&loaded, "Outer", "Ljava/lang/Object;", SignatureKind::Class)
            .unwrap_err();
        assert!(err.to_string().contains("<T>"));
    }

    #[test]
    fn test_class_signature_binds_in_class_scope() {
        let (_file, loaded) = loaded();
        let out = render(
            &loaded,
            "Outer",
            "<T:Ljava/lang/Number;>Ljava/lang/Object;Ljava/lang/Comparable<TT;>;",
            SignatureKind::Class,
        )
        .unwrap();
        assert_eq!(out, "extends: java.lang.Object\nimplements: java.lang.Comparable<T>");
    }

    #[test]
    fn test_unresolved_variable_is_an_error() {
        let (_file, loaded) = loaded();
        let err = render(&loaded, "Outer", "TR;", SignatureKind::Field).unwrap_err();
        assert!(err.to_string().contains("'R'"));
    }
}
