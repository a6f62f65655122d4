//! Semantic analysis for the Bhagwad language
//!
//! Performs:
//! - Symbol table management (scopes, definitions)
//! - Constant reassignment and duplicate declaration checks
//! - Name resolution by lexical scope
//! - Return-type arity checks
//! - Entry block uniqueness

use crate::frontend::ast::*;
use crate::utils::{Error, Result, Span};
use std::collections::{HashMap, HashSet};

// ==================== Symbol Table ====================

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScopeId(usize);

/// Kind of symbol
#[derive(Debug, Clone)]
enum SymbolKind {
    Variable { constant: bool },
    Param,
    Function,
    Namespace,
}

/// A scope containing symbols
#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<String, SymbolKind>,
}

/// Symbol table with nested scopes
struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    fn new() -> Self {
        let global = Scope {
            parent: None,
            symbols: HashMap::new(),
        };
        Self {
            scopes: vec![global],
            current: ScopeId(0),
        }
    }

    /// Enter a new scope
    fn enter_scope(&mut self) {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(self.current),
            symbols: HashMap::new(),
        });
        self.current = id;
    }

    /// Exit the current scope
    fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    /// Define a symbol in the current scope, shadowing any earlier binding
    fn define(&mut self, name: &str, kind: SymbolKind) {
        self.scopes[self.current.0]
            .symbols
            .insert(name.to_string(), kind);
    }

    /// Whether the current scope already holds this name
    fn defined_locally(&self, name: &str) -> bool {
        self.scopes[self.current.0].symbols.contains_key(name)
    }

    /// Look up a symbol, searching from the current scope upward
    fn lookup(&self, name: &str) -> Option<&SymbolKind> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            if let Some(symbol) = self.scopes[id.0].symbols.get(name) {
                return Some(symbol);
            }
            scope_id = self.scopes[id.0].parent;
        }
        None
    }
}

// ==================== Semantic Analyzer ====================

/// The function-like context a `moksha` statement returns from
struct ReturnCtx {
    name: String,
    has_ret_type: bool,
}

/// Semantic analyzer
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    ctx: Option<ReturnCtx>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            ctx: None,
        }
    }

    /// Validate a parsed program. `eof_span` locates end-of-input
    /// diagnostics such as a missing entry block.
    pub fn analyze(&mut self, program: &Program, eof_span: Span) -> Result<()> {
        self.declare_items(program)?;
        self.check_items(program)?;

        if !program.items.iter().any(|i| matches!(i, Item::Entry(_))) {
            return Err(Error::MissingEntry { span: eof_span });
        }
        Ok(())
    }

    /// First pass: bring every top-level name into the program scope so
    /// bodies may reference functions declared later.
    fn declare_items(&mut self, program: &Program) -> Result<()> {
        let mut entry_seen = false;

        for item in &program.items {
            match item {
                Item::Function(f) => {
                    self.declare_function(f)?;
                }
                Item::Namespace(ns) => {
                    if self.symbols.defined_locally(&ns.name.name) {
                        return Err(Error::DuplicateFunction {
                            name: ns.name.name.clone(),
                            span: ns.name.span,
                        });
                    }
                    self.symbols.define(&ns.name.name, SymbolKind::Namespace);

                    // Member names must be unique within the namespace
                    let mut local: HashSet<&str> = HashSet::new();
                    for member in &ns.members {
                        if !local.insert(&member.name.name) {
                            return Err(Error::DuplicateFunction {
                                name: member.name.name.clone(),
                                span: member.name.span,
                            });
                        }

                        // Flat visibility: members join the program scope.
                        // Across namespaces the first definition wins.
                        if !self.symbols.defined_locally(&member.name.name) {
                            self.symbols
                                .define(&member.name.name, SymbolKind::Function);
                        }
                    }
                }
                Item::Entry(entry) => {
                    if entry_seen {
                        return Err(Error::DuplicateEntry { span: entry.span });
                    }
                    entry_seen = true;
                }
            }
        }
        Ok(())
    }

    fn declare_function(&mut self, f: &Function) -> Result<()> {
        if self.symbols.defined_locally(&f.name.name) {
            return Err(Error::DuplicateFunction {
                name: f.name.name.clone(),
                span: f.name.span,
            });
        }
        self.symbols.define(&f.name.name, SymbolKind::Function);
        Ok(())
    }

    /// Second pass: walk every body with full scope tracking.
    fn check_items(&mut self, program: &Program) -> Result<()> {
        for item in &program.items {
            match item {
                Item::Function(f) => self.check_function(f)?,
                Item::Namespace(ns) => {
                    for member in &ns.members {
                        self.check_function(member)?;
                    }
                }
                Item::Entry(entry) => {
                    self.ctx = Some(ReturnCtx {
                        name: "arjuna".to_string(),
                        has_ret_type: false,
                    });
                    self.check_block(&entry.body)?;
                    self.ctx = None;
                }
            }
        }
        Ok(())
    }

    fn check_function(&mut self, f: &Function) -> Result<()> {
        self.symbols.enter_scope();
        for param in &f.params {
            if self.symbols.defined_locally(&param.name.name) {
                return Err(Error::DuplicateParameter {
                    name: param.name.name.clone(),
                    span: param.name.span,
                });
            }
            self.symbols.define(&param.name.name, SymbolKind::Param);
        }

        self.ctx = Some(ReturnCtx {
            name: f.name.name.clone(),
            has_ret_type: f.ret_type.is_some(),
        });
        let result = self.check_block(&f.body);
        self.ctx = None;
        self.symbols.exit_scope();
        result
    }

    fn check_block(&mut self, block: &Block) -> Result<()> {
        self.symbols.enter_scope();
        let result = block.stmts.iter().try_for_each(|s| self.check_stmt(s));
        self.symbols.exit_scope();
        result
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Var { name, value, constant, .. } => {
                // The initializer cannot see the name being bound
                self.check_expr(value)?;
                self.symbols
                    .define(&name.name, SymbolKind::Variable { constant: *constant });
                Ok(())
            }
            Stmt::Assign { target, value, .. } => {
                self.check_lvalue(target)?;
                self.check_expr(value)
            }
            Stmt::If { cond, then_block, else_block, .. } => {
                self.check_expr(cond)?;
                self.check_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block)?;
                }
                Ok(())
            }
            Stmt::RangeLoop { var, from, to, body, .. } => {
                self.check_expr(from)?;
                self.check_expr(to)?;
                self.symbols.enter_scope();
                self.symbols
                    .define(&var.name, SymbolKind::Variable { constant: false });
                let result = self.check_block(body);
                self.symbols.exit_scope();
                result
            }
            Stmt::WhileLoop { cond, body, .. } => {
                self.check_expr(cond)?;
                self.check_block(body)
            }
            Stmt::ForIn { var, iter, body, .. } => {
                self.check_expr(iter)?;
                self.symbols.enter_scope();
                self.symbols
                    .define(&var.name, SymbolKind::Variable { constant: false });
                let result = self.check_block(body);
                self.symbols.exit_scope();
                result
            }
            Stmt::Print { expr, .. } => self.check_expr(expr),
            Stmt::Return { value, span } => self.check_return(value.as_ref(), *span),
            Stmt::TryCatch { try_block, err_name, catch_block, .. } => {
                self.check_block(try_block)?;
                self.symbols.enter_scope();
                self.symbols
                    .define(&err_name.name, SymbolKind::Variable { constant: false });
                let result = self.check_block(catch_block);
                self.symbols.exit_scope();
                result
            }
            Stmt::Expr(expr) => self.check_expr(expr),
        }
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) -> Result<()> {
        let ctx = self.ctx.as_ref().expect("moksha outside any body");
        match value {
            Some(expr) => {
                if !ctx.has_ret_type {
                    return Err(Error::ReturnValueInVoidFunction {
                        name: ctx.name.clone(),
                        span,
                    });
                }
                self.check_expr(expr)
            }
            None => {
                if ctx.has_ret_type {
                    return Err(Error::MissingReturnValue {
                        name: ctx.name.clone(),
                        span,
                    });
                }
                Ok(())
            }
        }
    }

    fn check_lvalue(&mut self, target: &LValue) -> Result<()> {
        let root = target.root();
        let Some(symbol) = self.symbols.lookup(&root.name) else {
            return Err(Error::UndefinedName {
                name: root.name.clone(),
                span: root.span,
            });
        };

        // Rebinding a constant is forbidden; mutating through an index or
        // field leaves the binding itself untouched
        if let LValue::Ident(id) = target {
            if matches!(symbol, SymbolKind::Variable { constant: true }) {
                return Err(Error::ConstantReassignment {
                    name: id.name.clone(),
                    span: id.span,
                });
            }
        }

        self.check_lvalue_indices(target)
    }

    fn check_lvalue_indices(&mut self, target: &LValue) -> Result<()> {
        match target {
            LValue::Ident(_) => Ok(()),
            LValue::Index { base, index, .. } => {
                self.check_lvalue_indices(base)?;
                self.check_expr(index)
            }
            LValue::Field { base, .. } => self.check_lvalue_indices(base),
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Ident(id) => {
                if self.symbols.lookup(&id.name).is_none() {
                    return Err(Error::UndefinedName {
                        name: id.name.clone(),
                        span: id.span,
                    });
                }
                Ok(())
            }
            Expr::Binary { left, right, .. } => {
                self.check_expr(left)?;
                self.check_expr(right)
            }
            Expr::Unary { expr, .. } => self.check_expr(expr),
            Expr::Call { callee, args, .. } => {
                self.check_expr(callee)?;
                args.iter().try_for_each(|a| self.check_expr(a))
            }
            Expr::Index { base, index, .. } => {
                self.check_expr(base)?;
                self.check_expr(index)
            }
            // Fields are opaque; only the base chain resolves
            Expr::Field { base, .. } => self.check_expr(base),
            Expr::Array { elements, .. } => {
                elements.iter().try_for_each(|e| self.check_expr(e))
            }
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{lexer, parser};

    fn analyze(source: &str) -> Result<Program> {
        parser::parse(lexer::tokenize(source).unwrap())
    }

    #[test]
    fn test_constant_reassignment() {
        let err = analyze(
            "arjuna {\n\
               sankalpa N = 7\n\
               manifest N\n\
               maya other = 1\n\
               N = 8\n\
             }",
        )
        .unwrap_err();

        assert!(matches!(err, Error::ConstantReassignment { ref name, .. } if name == "N"));
        assert_eq!(err.span().line, 5);
    }

    #[test]
    fn test_variable_reassignment_allowed() {
        assert!(analyze("arjuna { maya x = 1 x = 2 }").is_ok());
    }

    #[test]
    fn test_duplicate_function() {
        let err = analyze(
            "shloka f() { } shloka f() { } arjuna { }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction { ref name, .. } if name == "f"));
    }

    #[test]
    fn test_duplicate_member_within_namespace() {
        let err = analyze(
            "yuga M { shloka f() { } shloka f() { } } arjuna { }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction { .. }));
    }

    #[test]
    fn test_same_member_name_across_namespaces() {
        assert!(analyze(
            "yuga A { shloka f() { } } yuga B { shloka f() { } } arjuna { f() }",
        )
        .is_ok());
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = analyze("shloka f(sattva a, sattva a) { } arjuna { }").unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_undefined_name() {
        let err = analyze("arjuna { manifest ghost }").unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_block_scope_does_not_leak() {
        let err = analyze(
            "arjuna { dharma (true) { maya x = 1 } manifest x }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_loop_var_scoped_to_body() {
        assert!(analyze("arjuna { karma i from 1 to 3 { manifest i } }").is_ok());

        let err = analyze("arjuna { karma i from 1 to 3 { } manifest i }").unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "i"));
    }

    #[test]
    fn test_flat_namespace_visibility() {
        // Members are callable without qualification and via the namespace
        assert!(analyze(
            "yuga Math {\n\
               shloka double(sattva n) -> sattva { moksha n * 2 }\n\
             }\n\
             arjuna {\n\
               manifest double(21)\n\
               manifest Math.double(21)\n\
             }",
        )
        .is_ok());
    }

    #[test]
    fn test_forward_reference() {
        assert!(analyze(
            "arjuna { manifest later() } shloka later() -> sattva { moksha 1 }",
        )
        .is_ok());
    }

    #[test]
    fn test_return_value_in_void_function() {
        let err = analyze("shloka f() { moksha 1 } arjuna { }").unwrap_err();
        assert!(matches!(err, Error::ReturnValueInVoidFunction { ref name, .. } if name == "f"));
    }

    #[test]
    fn test_missing_return_value() {
        let err = analyze("shloka f() -> sattva { moksha } arjuna { }").unwrap_err();
        assert!(matches!(err, Error::MissingReturnValue { ref name, .. } if name == "f"));
    }

    #[test]
    fn test_return_value_in_entry_block() {
        let err = analyze("arjuna { moksha 1 }").unwrap_err();
        assert!(matches!(err, Error::ReturnValueInVoidFunction { .. }));

        assert!(analyze("arjuna { moksha }").is_ok());
    }

    #[test]
    fn test_duplicate_entry() {
        let err = analyze("arjuna { } arjuna { }").unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { .. }));
    }

    #[test]
    fn test_missing_entry() {
        let err = analyze("shloka f() { }").unwrap_err();
        assert!(matches!(err, Error::MissingEntry { .. }));
    }

    #[test]
    fn test_catch_name_visible_in_catch_block() {
        assert!(analyze(
            "arjuna { meditation { manifest 1 } disturbance (err) { manifest err } }",
        )
        .is_ok());

        let err = analyze(
            "arjuna { meditation { } disturbance (err) { } manifest err }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "err"));
    }
}
