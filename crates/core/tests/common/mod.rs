#![allow(dead_code)]

use genscope_api::{
    ClassId, ConstructorId, DeclarationReader, GenericDecl, MethodId, TypeVariable,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hand-wired declaration facts that count every navigation query, so tests
/// can observe how often enclosing scopes are derived.
#[derive(Default)]
pub struct CountingDecls {
    names: HashMap<GenericDecl, String>,
    params: HashMap<GenericDecl, Vec<TypeVariable>>,
    enclosing_method: HashMap<ClassId, MethodId>,
    enclosing_constructor: HashMap<ClassId, ConstructorId>,
    enclosing_class: HashMap<ClassId, ClassId>,
    method_class: HashMap<MethodId, ClassId>,
    constructor_class: HashMap<ConstructorId, ClassId>,
    navigations: AtomicUsize,
    next_id: u32,
}

impl CountingDecls {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn class(&mut self, name: &str, params: &[&str]) -> ClassId {
        let id = ClassId(self.next());
        self.register(GenericDecl::Class(id), name, params);
        id
    }

    pub fn method(&mut self, owner: ClassId, name: &str, params: &[&str]) -> MethodId {
        let id = MethodId(self.next());
        self.register(GenericDecl::Method(id), name, params);
        self.method_class.insert(id, owner);
        id
    }

    pub fn constructor(&mut self, owner: ClassId, params: &[&str]) -> ConstructorId {
        let id = ConstructorId(self.next());
        self.register(GenericDecl::Constructor(id), "<init>", params);
        self.constructor_class.insert(id, owner);
        id
    }

    pub fn nest_in_class(&mut self, class: ClassId, outer: ClassId) {
        self.enclosing_class.insert(class, outer);
    }

    /// Local class in a method body; also reports the method's class, as
    /// reflection does.
    pub fn nest_in_method(&mut self, class: ClassId, method: MethodId) {
        self.enclosing_method.insert(class, method);
        if let Some(owner) = self.method_class.get(&method).copied() {
            self.enclosing_class.insert(class, owner);
        }
    }

    pub fn nest_in_constructor(&mut self, class: ClassId, constructor: ConstructorId) {
        self.enclosing_constructor.insert(class, constructor);
        if let Some(owner) = self.constructor_class.get(&constructor).copied() {
            self.enclosing_class.insert(class, owner);
        }
    }

    /// Registers an enclosing method without touching any other fact.
    pub fn set_enclosing_method(&mut self, class: ClassId, method: MethodId) {
        self.enclosing_method.insert(class, method);
    }

    pub fn set_enclosing_constructor(&mut self, class: ClassId, constructor: ConstructorId) {
        self.enclosing_constructor.insert(class, constructor);
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    fn register(&mut self, decl: GenericDecl, name: &str, params: &[&str]) {
        self.names.insert(decl, name.to_string());
        let vars = params
            .iter()
            .enumerate()
            .map(|(i, p)| TypeVariable::new(*p, decl, i, vec![]))
            .collect();
        self.params.insert(decl, vars);
    }

    fn count(&self) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }
}

impl DeclarationReader for CountingDecls {
    fn type_parameters(&self, decl: GenericDecl) -> &[TypeVariable] {
        self.params.get(&decl).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn enclosing_method(&self, class: ClassId) -> Option<MethodId> {
        self.count();
        self.enclosing_method.get(&class).copied()
    }

    fn enclosing_constructor(&self, class: ClassId) -> Option<ConstructorId> {
        self.count();
        self.enclosing_constructor.get(&class).copied()
    }

    fn enclosing_class(&self, class: ClassId) -> Option<ClassId> {
        self.count();
        self.enclosing_class.get(&class).copied()
    }

    fn method_declaring_class(&self, method: MethodId) -> Option<ClassId> {
        self.count();
        self.method_class.get(&method).copied()
    }

    fn constructor_declaring_class(&self, constructor: ConstructorId) -> Option<ClassId> {
        self.count();
        self.constructor_class.get(&constructor).copied()
    }

    fn display_name(&self, decl: GenericDecl) -> Option<&str> {
        self.names.get(&decl).map(String::as_str)
    }
}
