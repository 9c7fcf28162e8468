//! Construction helpers for tests: build arena-allocated ASTs whose spans
//! point into real source text. Spans are derived by needle search over the
//! source so that the text the planner rewrites and the tree the analyzer
//! walks can never drift apart.

pub use super::cpp_ast::arena::AstArena;
pub use super::cpp_ast::expr::{
    CallExpr, CastKind, ConstructExpr, CppExpr, DeclRefExpr, ImplicitCastExpr, IntegerLiteralExpr,
    StringLiteralExpr,
};
pub use super::cpp_ast::source_map::SourceMap;
pub use super::cpp_ast::stmt::{
    BlockStmt, CppStatement, DeclStmt, ExprStmt, IfElseStmt, ReturnStmt, WhileStmt,
};
pub use super::cpp_ast::ty::{CppTy, CtorKind};
pub use super::cpp_ast::{DeclId, FunctionDef, StorageClass, TranslationUnit, VarDecl};
pub use super::utils::{FileId, Position, Span};

fn find_nth(haystack: &str, needle: &str, nth: usize) -> Option<usize> {
    haystack.match_indices(needle).nth(nth).map(|(i, _)| i)
}

/// One translation unit under construction: the arena, the source map with
/// the primary file registered, and span lookup over its text.
pub struct TestUnit<'a> {
    arena: &'a AstArena<'a>,
    pub map: SourceMap,
    file: FileId,
    src: String,
}

impl<'a> TestUnit<'a> {
    pub fn new(arena: &'a AstArena<'a>, src: &str) -> Self {
        let mut map = SourceMap::new();
        let file = map.add_file("input.cpp", src);
        Self {
            arena,
            map,
            file,
            src: src.to_string(),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Span of the `nth` occurrence of `needle` in the primary file.
    /// Occurrences are counted over raw text, substrings of longer words
    /// included.
    pub fn span(&self, needle: &str, nth: usize) -> Span {
        let start = find_nth(&self.src, needle, nth)
            .unwrap_or_else(|| panic!("needle {needle:?} occurrence {nth} not in source"));
        Span::new(self.file, start, start + needle.len())
    }

    fn whole_file(&self) -> Span {
        Span::new(self.file, 0, self.src.len())
    }

    // ---- types ----

    pub fn record(&self, name: &str, ctors: Vec<CtorKind>) -> &'a CppTy<'a> {
        let name = self.arena.names().get(name);
        self.arena.types().get_record_ty(name, ctors)
    }

    /// A record with default, copy and move constructors.
    pub fn string_like(&self) -> &'a CppTy<'a> {
        self.record(
            "StringLike",
            vec![CtorKind::Default, CtorKind::Copy, CtorKind::Move],
        )
    }

    /// A record without a move constructor.
    pub fn copy_only(&self, name: &str) -> &'a CppTy<'a> {
        self.record(name, vec![CtorKind::Default, CtorKind::Copy])
    }

    /// A record with a move constructor and no copy constructor.
    pub fn move_only(&self, name: &str) -> &'a CppTy<'a> {
        self.record(name, vec![CtorKind::Default, CtorKind::Move])
    }

    pub fn void_ty(&self) -> &'a CppTy<'a> {
        self.arena.types().get_void_ty()
    }

    pub fn bool_ty(&self) -> &'a CppTy<'a> {
        self.arena.types().get_bool_ty()
    }

    pub fn int_ty(&self) -> &'a CppTy<'a> {
        self.arena.types().get_int_ty()
    }

    pub fn const_of(&self, inner: &'a CppTy<'a>) -> &'a CppTy<'a> {
        self.arena.types().get_const_ty(inner)
    }

    pub fn lref_of(&self, inner: &'a CppTy<'a>) -> &'a CppTy<'a> {
        self.arena.types().get_lvalue_ref_ty(inner)
    }

    // ---- declarations ----

    fn var(
        &self,
        name: &str,
        ty: &'a CppTy<'a>,
        storage: StorageClass,
        needle: &str,
        nth: usize,
    ) -> &'a VarDecl<'a> {
        let name = self.arena.names().get(name);
        self.arena.intern(VarDecl {
            id: self.arena.fresh_decl_id(),
            name,
            ty,
            storage,
            span: self.span(needle, nth),
        })
    }

    pub fn local(&self, name: &str, ty: &'a CppTy<'a>, needle: &str, nth: usize) -> &'a VarDecl<'a> {
        self.var(name, ty, StorageClass::Local, needle, nth)
    }

    pub fn param(&self, name: &str, ty: &'a CppTy<'a>, needle: &str, nth: usize) -> &'a VarDecl<'a> {
        self.var(name, ty, StorageClass::Param, needle, nth)
    }

    pub fn static_var(
        &self,
        name: &str,
        ty: &'a CppTy<'a>,
        needle: &str,
        nth: usize,
    ) -> &'a VarDecl<'a> {
        self.var(name, ty, StorageClass::Static, needle, nth)
    }

    // ---- expressions ----

    pub fn decl_ref_at(&self, var: &'a VarDecl<'a>, span: Span) -> &'a CppExpr<'a> {
        self.arena.intern(CppExpr::DeclRef(DeclRefExpr {
            span,
            ty: var.ty,
            decl: var,
        }))
    }

    pub fn decl_ref(&self, var: &'a VarDecl<'a>, needle: &str, nth: usize) -> &'a CppExpr<'a> {
        self.decl_ref_at(var, self.span(needle, nth))
    }

    pub fn str_lit(&self, needle: &str) -> &'a CppExpr<'a> {
        let char_ty = self.arena.types().get_char_ty();
        let ty = self
            .arena
            .types()
            .get_pointer_ty(self.arena.types().get_const_ty(char_ty));
        self.arena.intern(CppExpr::StringLiteral(StringLiteralExpr {
            span: self.span(needle, 0),
            ty,
            value: self.arena.names().get(needle),
        }))
    }

    pub fn int_lit(&self, needle: &str, nth: usize) -> &'a CppExpr<'a> {
        self.arena.intern(CppExpr::IntegerLiteral(IntegerLiteralExpr {
            span: self.span(needle, nth),
            ty: self.int_ty(),
            value: needle.parse().unwrap_or(0),
        }))
    }

    /// A call expression from raw parts, for shapes the composite helpers
    /// below do not cover.
    pub fn call_expr_with(
        &self,
        callee: &str,
        args: Vec<&'a CppExpr<'a>>,
        needle: &str,
        nth: usize,
    ) -> &'a CppExpr<'a> {
        let span = self.span(needle, nth);
        let callee_span = Span::new(span.file, span.start, span.start + callee.len());
        self.arena.intern(CppExpr::Call(CallExpr {
            span,
            ty: self.void_ty(),
            callee: self.arena.names().get(callee),
            callee_span,
            args,
        }))
    }

    /// `callee(a, b, ...)` with plain variable arguments. The needle is
    /// reconstructed from the argument names, so the source must spell the
    /// call exactly that way.
    pub fn call_expr(
        &self,
        callee: &str,
        args: Vec<&'a VarDecl<'a>>,
        nth: usize,
    ) -> &'a CppExpr<'a> {
        let names = args.iter().map(|a| a.name).collect::<Vec<_>>().join(", ");
        let needle = format!("{callee}({names})");
        let span = self.span(&needle, nth);

        let mut arg_exprs = Vec::with_capacity(args.len());
        let mut offset = span.start + callee.len() + 1;
        for arg in args {
            let arg_span = Span::new(span.file, offset, offset + arg.name.len());
            arg_exprs.push(self.decl_ref_at(arg, arg_span));
            offset += arg.name.len() + 2;
        }

        let callee_span = Span::new(span.file, span.start, span.start + callee.len());
        self.arena.intern(CppExpr::Call(CallExpr {
            span,
            ty: self.void_ty(),
            callee: self.arena.names().get(callee),
            callee_span,
            args: arg_exprs,
        }))
    }

    /// `std::move(v)` spelled in the source, modeled as a plain call.
    pub fn std_move_call(&self, var: &'a VarDecl<'a>, nth: usize) -> &'a CppExpr<'a> {
        let needle = format!("std::move({})", var.name);
        let span = self.span(&needle, nth);
        let arg_start = span.start + "std::move(".len();
        let arg = self.decl_ref_at(var, Span::new(span.file, arg_start, arg_start + var.name.len()));
        let callee_span = Span::new(span.file, span.start, span.start + "std::move".len());
        self.arena.intern(CppExpr::Call(CallExpr {
            span,
            ty: self.arena.types().get_rvalue_ref_ty(var.ty),
            callee: self.arena.names().get("std::move"),
            callee_span,
            args: vec![arg],
        }))
    }

    /// Wraps an expression in the implicit copy construction a frontend
    /// inserts for a by-value record argument.
    pub fn implicit_copy(&self, inner: &'a CppExpr<'a>, ty: &'a CppTy<'a>) -> &'a CppExpr<'a> {
        self.arena.intern(CppExpr::Construct(ConstructExpr {
            span: inner.span(),
            ty,
            ctor: CtorKind::Copy,
            implicit: true,
            arg: Some(inner),
        }))
    }

    pub fn lvalue_to_rvalue(&self, inner: &'a CppExpr<'a>) -> &'a CppExpr<'a> {
        self.arena.intern(CppExpr::ImplicitCast(ImplicitCastExpr {
            span: inner.span(),
            ty: inner.ty(),
            kind: CastKind::LvalueToRvalue,
            inner,
        }))
    }

    // ---- statements ----

    pub fn expr_stmt(&self, expr: &'a CppExpr<'a>) -> &'a CppStatement<'a> {
        self.arena.intern(CppStatement::Expr(ExprStmt {
            span: expr.span(),
            expr,
        }))
    }

    /// `callee(args...);` as an expression statement.
    pub fn call_stmt(
        &self,
        callee: &str,
        args: Vec<&'a VarDecl<'a>>,
        nth: usize,
    ) -> &'a CppStatement<'a> {
        self.expr_stmt(self.call_expr(callee, args, nth))
    }

    /// `consume(v);` — the workhorse of the scenarios.
    pub fn consume_stmt(&self, var: &'a VarDecl<'a>, nth: usize) -> &'a CppStatement<'a> {
        self.call_stmt("consume", vec![var], nth)
    }

    /// The call expression inside the `nth` `consume(v)` in the source.
    pub fn consume_call(&self, var: &'a VarDecl<'a>, nth: usize) -> &'a CppExpr<'a> {
        self.call_expr("consume", vec![var], nth)
    }

    pub fn decl_stmt(
        &self,
        var: &'a VarDecl<'a>,
        init: Option<&'a CppExpr<'a>>,
    ) -> &'a CppStatement<'a> {
        let span = match init {
            Some(expr) => Span::union_span(&var.span, &expr.span()),
            None => var.span,
        };
        self.arena
            .intern(CppStatement::Decl(DeclStmt { span, var, init }))
    }

    pub fn return_stmt(
        &self,
        needle: &str,
        nth: usize,
        value: Option<&'a CppExpr<'a>>,
    ) -> &'a CppStatement<'a> {
        self.arena.intern(CppStatement::Return(ReturnStmt {
            span: self.span(needle, nth),
            value,
        }))
    }

    /// `return v;` — span of the keyword plus a reference to `v`.
    pub fn return_of(&self, var: &'a VarDecl<'a>, nth: usize) -> &'a CppStatement<'a> {
        let needle = format!("return {}", var.name);
        let span = self.span(&needle, nth);
        let keyword = Span::new(span.file, span.start, span.start + "return".len());
        let var_start = span.start + "return ".len();
        let value = self.decl_ref_at(var, Span::new(span.file, var_start, var_start + var.name.len()));
        self.arena.intern(CppStatement::Return(ReturnStmt {
            span: keyword,
            value: Some(value),
        }))
    }

    pub fn break_stmt(&self, needle: &str, nth: usize) -> &'a CppStatement<'a> {
        self.arena
            .intern(CppStatement::Break(self.span(needle, nth)))
    }

    pub fn if_else(
        &self,
        condition: &'a CppExpr<'a>,
        then_branch: &'a BlockStmt<'a>,
        else_branch: Option<&'a BlockStmt<'a>>,
    ) -> &'a CppStatement<'a> {
        self.arena.intern(CppStatement::IfElse(IfElseStmt {
            span: condition.span(),
            condition,
            then_branch,
            else_branch,
        }))
    }

    pub fn while_stmt(
        &self,
        condition: &'a CppExpr<'a>,
        body: &'a BlockStmt<'a>,
    ) -> &'a CppStatement<'a> {
        self.arena.intern(CppStatement::While(WhileStmt {
            span: condition.span(),
            condition,
            body,
        }))
    }

    pub fn block(&self, statements: Vec<&'a CppStatement<'a>>) -> &'a BlockStmt<'a> {
        self.arena.intern(BlockStmt {
            span: self.whole_file(),
            statements,
        })
    }

    // ---- items ----

    pub fn function(
        &self,
        name: &str,
        params: Vec<&'a VarDecl<'a>>,
        ret_ty: &'a CppTy<'a>,
        body: Option<&'a BlockStmt<'a>>,
    ) -> &'a FunctionDef<'a> {
        self.arena.intern(FunctionDef {
            span: self.whole_file(),
            name: self.arena.names().get(name),
            params,
            ret_ty,
            body,
        })
    }

    pub fn unit(&self, functions: Vec<&'a FunctionDef<'a>>) -> &'a TranslationUnit<'a> {
        self.arena.intern(TranslationUnit { functions })
    }
}
