use crate::error::{GenscopeError, Result};
use crate::signature::{parse_class_signature, parse_method_signature};
use genscope_api::{
    ClassId, ConstructorId, DeclarationReader, FormalTypeParameter, GenericDecl, MethodId,
    TypeVariable,
};
use smol_str::SmolStr;
use std::collections::HashMap;

/// Where a class is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSite {
    TopLevel,
    /// Static or inner member class.
    Member(ClassId),
    /// Local or anonymous class in a method body.
    Method(MethodId),
    /// Local or anonymous class in a constructor body.
    Constructor(ConstructorId),
    /// Anonymous class in a field or instance initializer.
    Initializer(ClassId),
}

#[derive(Debug, Clone, Copy)]
enum EnclosingMember {
    Method(MethodId),
    Constructor(ConstructorId),
}

#[derive(Debug)]
struct ClassEntry {
    path: String,
    is_interface: bool,
    enclosing_class: Option<ClassId>,
    enclosing_member: Option<EnclosingMember>,
    signature: Option<String>,
    type_parameters: Vec<TypeVariable>,
}

#[derive(Debug)]
struct MemberEntry {
    name: SmolStr,
    path: String,
    declaring_class: ClassId,
    signature: Option<String>,
    type_parameters: Vec<TypeVariable>,
}

/// In-memory declaration metadata, addressable by path.
///
/// Paths: `Outer`, `Outer.Inner`, `Outer#m`, `Outer#<init>`, `Outer#m.Local`.
/// Overloaded methods and constructors get an ordinal suffix after the first:
/// `Outer#m~1`, `Outer#<init>~2`.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    classes: Vec<ClassEntry>,
    methods: Vec<MemberEntry>,
    constructors: Vec<MemberEntry>,
    paths: HashMap<String, GenericDecl>,
}

const CONSTRUCTOR_NAME: &str = "<init>";

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, name: &str, site: ClassSite) -> Result<ClassId> {
        let (parent_path, enclosing_class, enclosing_member) = match site {
            ClassSite::TopLevel => (None, None, None),
            ClassSite::Member(outer) | ClassSite::Initializer(outer) => {
                (Some(self.class(outer)?.path.clone()), Some(outer), None)
            }
            ClassSite::Method(method) => {
                let entry = self.method(method)?;
                (
                    Some(entry.path.clone()),
                    Some(entry.declaring_class),
                    Some(EnclosingMember::Method(method)),
                )
            }
            ClassSite::Constructor(constructor) => {
                let entry = self.constructor(constructor)?;
                (
                    Some(entry.path.clone()),
                    Some(entry.declaring_class),
                    Some(EnclosingMember::Constructor(constructor)),
                )
            }
        };

        let path = match parent_path {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        };
        let id = ClassId(self.classes.len() as u32);
        self.register_path(&path, GenericDecl::Class(id))?;
        self.classes.push(ClassEntry {
            path,
            is_interface: false,
            enclosing_class,
            enclosing_member,
            signature: None,
            type_parameters: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_method(&mut self, class: ClassId, name: &str) -> Result<MethodId> {
        let path = self.member_path(class, name)?;
        let id = MethodId(self.methods.len() as u32);
        self.register_path(&path, GenericDecl::Method(id))?;
        self.methods.push(MemberEntry {
            name: SmolStr::new(name),
            path,
            declaring_class: class,
            signature: None,
            type_parameters: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_constructor(&mut self, class: ClassId) -> Result<ConstructorId> {
        let path = self.member_path(class, CONSTRUCTOR_NAME)?;
        let id = ConstructorId(self.constructors.len() as u32);
        self.register_path(&path, GenericDecl::Constructor(id))?;
        self.constructors.push(MemberEntry {
            name: SmolStr::new(CONSTRUCTOR_NAME),
            path,
            declaring_class: class,
            signature: None,
            type_parameters: Vec::new(),
        });
        Ok(id)
    }

    pub fn mark_interface(&mut self, class: ClassId) -> Result<()> {
        let entry = self.classes.get_mut(class.0 as usize).ok_or_else(|| {
            GenscopeError::UnknownDeclaration(GenericDecl::Class(class).to_string())
        })?;
        entry.is_interface = true;
        Ok(())
    }

    /// Declares the type parameters of `decl`, in order. A declaration's
    /// parameters can only be declared once.
    pub fn declare_type_parameters(
        &mut self,
        decl: GenericDecl,
        params: &[FormalTypeParameter],
    ) -> Result<()> {
        let variables: Vec<TypeVariable> = params
            .iter()
            .enumerate()
            .map(|(index, p)| TypeVariable::new(p.name.clone(), decl, index, p.bounds()))
            .collect();

        let slot = self.type_parameters_mut(decl)?;
        if !slot.is_empty() {
            return Err(GenscopeError::Model(format!(
                "type parameters of {} declared twice",
                decl
            )));
        }
        *slot = variables;
        Ok(())
    }

    pub fn declare_type_parameter_names(&mut self, decl: GenericDecl, names: &[&str]) -> Result<()> {
        let params: Vec<FormalTypeParameter> = names
            .iter()
            .map(|n| FormalTypeParameter::unbounded(*n))
            .collect();
        self.declare_type_parameters(decl, &params)
    }

    /// Attaches a generic signature and declares the formal type parameters
    /// it introduces.
    pub fn set_signature(&mut self, decl: GenericDecl, signature: &str) -> Result<()> {
        let params = match decl {
            GenericDecl::Class(_) => parse_class_signature(signature)?.type_parameters,
            GenericDecl::Method(_) | GenericDecl::Constructor(_) => {
                parse_method_signature(signature)?.type_parameters
            }
        };
        self.declare_type_parameters(decl, &params)?;

        let slot = match decl {
            GenericDecl::Class(id) => self.classes.get_mut(id.0 as usize).map(|e| &mut e.signature),
            GenericDecl::Method(id) => self.methods.get_mut(id.0 as usize).map(|e| &mut e.signature),
            GenericDecl::Constructor(id) => self
                .constructors
                .get_mut(id.0 as usize)
                .map(|e| &mut e.signature),
        };
        match slot {
            Some(slot) => {
                *slot = Some(signature.to_string());
                Ok(())
            }
            None => Err(GenscopeError::UnknownDeclaration(decl.to_string())),
        }
    }

    pub fn lookup(&self, path: &str) -> Option<GenericDecl> {
        self.paths.get(path).copied()
    }

    pub fn resolve_path(&self, path: &str) -> Result<GenericDecl> {
        self.lookup(path)
            .ok_or_else(|| GenscopeError::UnknownDeclaration(path.to_string()))
    }

    pub fn path_of(&self, decl: GenericDecl) -> Option<&str> {
        match decl {
            GenericDecl::Class(id) => self.classes.get(id.0 as usize).map(|e| e.path.as_str()),
            GenericDecl::Method(id) => self.methods.get(id.0 as usize).map(|e| e.path.as_str()),
            GenericDecl::Constructor(id) => self
                .constructors
                .get(id.0 as usize)
                .map(|e| e.path.as_str()),
        }
    }

    /// Simple name of a method, `<init>` for constructors.
    pub fn member_name(&self, decl: GenericDecl) -> Option<&str> {
        match decl {
            GenericDecl::Class(_) => None,
            GenericDecl::Method(id) => self.methods.get(id.0 as usize).map(|e| e.name.as_str()),
            GenericDecl::Constructor(id) => self
                .constructors
                .get(id.0 as usize)
                .map(|e| e.name.as_str()),
        }
    }

    /// Every declaration, classes first, in insertion order.
    pub fn declarations(&self) -> impl Iterator<Item = GenericDecl> + '_ {
        let classes = (0..self.classes.len()).map(|i| GenericDecl::Class(ClassId(i as u32)));
        let methods = (0..self.methods.len()).map(|i| GenericDecl::Method(MethodId(i as u32)));
        let constructors = (0..self.constructors.len())
            .map(|i| GenericDecl::Constructor(ConstructorId(i as u32)));
        classes.chain(methods).chain(constructors)
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.methods.len() + self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn class(&self, id: ClassId) -> Result<&ClassEntry> {
        self.classes
            .get(id.0 as usize)
            .ok_or_else(|| GenscopeError::UnknownDeclaration(GenericDecl::Class(id).to_string()))
    }

    fn method(&self, id: MethodId) -> Result<&MemberEntry> {
        self.methods
            .get(id.0 as usize)
            .ok_or_else(|| GenscopeError::UnknownDeclaration(GenericDecl::Method(id).to_string()))
    }

    fn constructor(&self, id: ConstructorId) -> Result<&MemberEntry> {
        self.constructors.get(id.0 as usize).ok_or_else(|| {
            GenscopeError::UnknownDeclaration(GenericDecl::Constructor(id).to_string())
        })
    }

    fn type_parameters_mut(&mut self, decl: GenericDecl) -> Result<&mut Vec<TypeVariable>> {
        let slot = match decl {
            GenericDecl::Class(id) => self
                .classes
                .get_mut(id.0 as usize)
                .map(|e| &mut e.type_parameters),
            GenericDecl::Method(id) => self
                .methods
                .get_mut(id.0 as usize)
                .map(|e| &mut e.type_parameters),
            GenericDecl::Constructor(id) => self
                .constructors
                .get_mut(id.0 as usize)
                .map(|e| &mut e.type_parameters),
        };
        slot.ok_or_else(|| GenscopeError::UnknownDeclaration(decl.to_string()))
    }

    fn member_path(&self, class: ClassId, name: &str) -> Result<String> {
        let base = format!("{}#{}", self.class(class)?.path, name);
        if !self.paths.contains_key(&base) {
            return Ok(base);
        }
        let mut ordinal = 1usize;
        loop {
            let candidate = format!("{}~{}", base, ordinal);
            if !self.paths.contains_key(&candidate) {
                return Ok(candidate);
            }
            ordinal += 1;
        }
    }

    fn register_path(&mut self, path: &str, decl: GenericDecl) -> Result<()> {
        if self.paths.contains_key(path) {
            return Err(GenscopeError::DuplicateDeclaration(path.to_string()));
        }
        self.paths.insert(path.to_string(), decl);
        Ok(())
    }
}

impl DeclarationReader for DeclarationTable {
    fn type_parameters(&self, decl: GenericDecl) -> &[TypeVariable] {
        let params = match decl {
            GenericDecl::Class(id) => self.classes.get(id.0 as usize).map(|e| &e.type_parameters),
            GenericDecl::Method(id) => self.methods.get(id.0 as usize).map(|e| &e.type_parameters),
            GenericDecl::Constructor(id) => self
                .constructors
                .get(id.0 as usize)
                .map(|e| &e.type_parameters),
        };
        params.map(|p| p.as_slice()).unwrap_or(&[])
    }

    fn enclosing_method(&self, class: ClassId) -> Option<MethodId> {
        match self.classes.get(class.0 as usize)?.enclosing_member? {
            EnclosingMember::Method(m) => Some(m),
            EnclosingMember::Constructor(_) => None,
        }
    }

    fn enclosing_constructor(&self, class: ClassId) -> Option<ConstructorId> {
        match self.classes.get(class.0 as usize)?.enclosing_member? {
            EnclosingMember::Constructor(c) => Some(c),
            EnclosingMember::Method(_) => None,
        }
    }

    fn enclosing_class(&self, class: ClassId) -> Option<ClassId> {
        self.classes.get(class.0 as usize)?.enclosing_class
    }

    fn method_declaring_class(&self, method: MethodId) -> Option<ClassId> {
        self.methods
            .get(method.0 as usize)
            .map(|e| e.declaring_class)
    }

    fn constructor_declaring_class(&self, constructor: ConstructorId) -> Option<ClassId> {
        self.constructors
            .get(constructor.0 as usize)
            .map(|e| e.declaring_class)
    }

    fn display_name(&self, decl: GenericDecl) -> Option<&str> {
        self.path_of(decl)
    }

    fn generic_signature(&self, decl: GenericDecl) -> Option<&str> {
        match decl {
            GenericDecl::Class(id) => self.classes.get(id.0 as usize)?.signature.as_deref(),
            GenericDecl::Method(id) => self.methods.get(id.0 as usize)?.signature.as_deref(),
            GenericDecl::Constructor(id) => {
                self.constructors.get(id.0 as usize)?.signature.as_deref()
            }
        }
    }

    fn is_interface(&self, class: ClassId) -> bool {
        self.classes
            .get(class.0 as usize)
            .is_some_and(|e| e.is_interface)
    }
}
