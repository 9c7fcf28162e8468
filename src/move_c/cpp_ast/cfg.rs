//! Control-flow graph construction over function bodies.
//!
//! The graph is the standard basic-block form: blocks hold an ordered list
//! of elements (statements, branch conditions, implicit destructors), edges
//! represent possible control transfers, and a distinguished entry and exit
//! block bracket the function. Implicit destructor elements are emitted at
//! scope exits so that a variable's last textual use is never confused with
//! its last dynamic use ahead of an observable destructor.
//!
//! Statements after a terminator still get blocks and elements; those
//! blocks simply never become reachable from the entry block, and the
//! reachability mask records that.

use rustc_hash::FxHashSet;

use super::expr::CppExpr;
use super::stmt::{BlockStmt, CppStatement};
use super::ty::CppTy;
use super::{StorageClass, VarDecl};

/// Identifier of a basic block, unique within one [`Cfg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// One program point inside a basic block.
#[derive(Debug, Clone, Copy)]
pub enum CfgElement<'ast> {
    /// A leaf statement evaluated for effect: declaration, expression
    /// statement, return, break or continue.
    Stmt(&'ast CppStatement<'ast>),
    /// The controlling condition of a branch or loop.
    Condition(&'ast CppExpr<'ast>),
    /// Implicit destructor of a record-typed local at scope exit.
    ImplicitDtor(&'ast VarDecl<'ast>),
    /// Destructor of a record temporary at the end of its full expression.
    TemporaryDtor(&'ast CppExpr<'ast>),
}

#[derive(Debug)]
pub struct CfgBlock<'ast> {
    pub id: BlockId,
    pub elements: Vec<CfgElement<'ast>>,
    pub succs: Vec<BlockId>,
}

/// Mirrors the frontend contract's CFG build switches. The analyzer turns
/// all of them on.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub add_implicit_dtors: bool,
    pub add_temporary_dtors: bool,
    /// Constructor member initializers do not occur in this AST model; the
    /// switch is accepted for contract parity.
    pub add_initializers: bool,
}

impl BuildOptions {
    /// The configuration the move analyzer requires.
    pub fn for_analysis() -> Self {
        Self {
            add_implicit_dtors: true,
            add_temporary_dtors: true,
            add_initializers: true,
        }
    }
}

#[derive(Debug)]
pub struct Cfg<'ast> {
    blocks: Vec<CfgBlock<'ast>>,
    entry: BlockId,
    exit: BlockId,
    reachable: Vec<bool>,
}

impl<'ast> Cfg<'ast> {
    pub fn build(body: &'ast BlockStmt<'ast>, options: BuildOptions) -> Cfg<'ast> {
        CfgBuilder::new(options).build(body)
    }

    pub fn blocks(&self) -> &[CfgBlock<'ast>] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&CfgBlock<'ast>> {
        self.blocks.get(id.0 as usize)
    }

    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exit(&self) -> BlockId {
        self.exit
    }

    /// Whether the block can be reached from the entry block at all.
    /// Statically unreached blocks exist for dead code.
    pub fn is_reached(&self, id: BlockId) -> bool {
        self.reachable.get(id.0 as usize).copied().unwrap_or(false)
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
}

struct LoopContext {
    continue_target: BlockId,
    break_target: BlockId,
    /// Scope-stack depth at loop entry; break and continue run destructors
    /// for every scope deeper than this.
    scope_depth: usize,
}

struct CfgBuilder<'ast> {
    options: BuildOptions,
    blocks: Vec<CfgBlock<'ast>>,
    scopes: Vec<Vec<&'ast VarDecl<'ast>>>,
    loops: Vec<LoopContext>,
    entry: BlockId,
    exit: BlockId,
    cur: BlockId,
    /// Whether the current block can still fall through.
    open: bool,
}

impl<'ast> CfgBuilder<'ast> {
    fn new(options: BuildOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            scopes: Vec::new(),
            loops: Vec::new(),
            entry: BlockId(0),
            exit: BlockId(0),
            cur: BlockId(0),
            open: true,
        }
    }

    fn build(mut self, body: &'ast BlockStmt<'ast>) -> Cfg<'ast> {
        self.entry = self.new_block();
        self.exit = self.new_block();

        let first = self.new_block();
        self.add_edge(self.entry, first);
        self.cur = first;
        self.open = true;

        self.visit_block(body);
        if self.open {
            self.add_edge(self.cur, self.exit);
        }

        let reachable = self.compute_reachable();
        tracing::debug!(
            num_blocks = self.blocks.len(),
            reached = reachable.iter().filter(|r| **r).count(),
            "built function cfg"
        );

        Cfg {
            blocks: self.blocks,
            entry: self.entry,
            exit: self.exit,
            reachable,
        }
    }

    fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(CfgBlock {
            id,
            elements: Vec::new(),
            succs: Vec::new(),
        });
        id
    }

    fn add_edge(&mut self, from: BlockId, to: BlockId) {
        let block = &mut self.blocks[from.0 as usize];
        if !block.succs.contains(&to) {
            block.succs.push(to);
        }
    }

    /// Appends an element to the current block, opening a fresh block first
    /// if the previous statement terminated control flow. Dead statements
    /// land in blocks the entry never reaches.
    fn push_element(&mut self, element: CfgElement<'ast>) {
        if !self.open {
            self.cur = self.new_block();
            self.open = true;
        }
        self.blocks[self.cur.0 as usize].elements.push(element);
    }

    fn visit_block(&mut self, block: &'ast BlockStmt<'ast>) {
        self.scopes.push(Vec::new());
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
        let scope = self.scopes.pop().unwrap_or_default();
        if self.open {
            self.emit_scope_dtors(&scope);
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast CppStatement<'ast>) {
        match stmt {
            CppStatement::Block(block) => self.visit_block(block),

            CppStatement::Decl(decl) => {
                self.push_element(CfgElement::Stmt(stmt));
                if self.options.add_implicit_dtors && needs_implicit_dtor(decl.var) {
                    if let Some(scope) = self.scopes.last_mut() {
                        scope.push(decl.var);
                    }
                }
            }

            CppStatement::Expr(expr_stmt) => {
                self.push_element(CfgElement::Stmt(stmt));
                if self.options.add_temporary_dtors && creates_record_temporary(expr_stmt.expr) {
                    self.push_element(CfgElement::TemporaryDtor(expr_stmt.expr));
                }
            }

            CppStatement::Return(_) => {
                self.push_element(CfgElement::Stmt(stmt));
                if self.options.add_implicit_dtors {
                    // Returning unwinds every open scope.
                    let pending: Vec<&'ast VarDecl<'ast>> = self
                        .scopes
                        .iter()
                        .rev()
                        .flat_map(|scope| scope.iter().rev().copied())
                        .collect();
                    for var in pending {
                        self.push_element(CfgElement::ImplicitDtor(var));
                    }
                }
                self.add_edge(self.cur, self.exit);
                self.open = false;
            }

            CppStatement::Break(_) => {
                self.push_element(CfgElement::Stmt(stmt));
                if let Some(target) = self.loop_exit_edges(|l| l.break_target) {
                    self.add_edge(self.cur, target);
                }
                self.open = false;
            }

            CppStatement::Continue(_) => {
                self.push_element(CfgElement::Stmt(stmt));
                if let Some(target) = self.loop_exit_edges(|l| l.continue_target) {
                    self.add_edge(self.cur, target);
                }
                self.open = false;
            }

            CppStatement::IfElse(if_else) => {
                self.push_element(CfgElement::Condition(if_else.condition));
                let branch = self.cur;

                let then_block = self.new_block();
                self.add_edge(branch, then_block);
                self.cur = then_block;
                self.open = true;
                self.visit_block(if_else.then_branch);
                let then_end = if self.open { Some(self.cur) } else { None };

                let else_end = if let Some(else_branch) = if_else.else_branch {
                    let else_block = self.new_block();
                    self.add_edge(branch, else_block);
                    self.cur = else_block;
                    self.open = true;
                    self.visit_block(else_branch);
                    if self.open {
                        Some(self.cur)
                    } else {
                        None
                    }
                } else {
                    // No else: the false edge falls through to the merge.
                    Some(branch)
                };

                let merge = self.new_block();
                if let Some(end) = then_end {
                    self.add_edge(end, merge);
                }
                if let Some(end) = else_end {
                    self.add_edge(end, merge);
                }
                self.cur = merge;
                self.open = true;
            }

            CppStatement::While(while_stmt) => {
                let cond_block = self.new_block();
                if self.open {
                    self.add_edge(self.cur, cond_block);
                }
                self.cur = cond_block;
                self.open = true;
                self.push_element(CfgElement::Condition(while_stmt.condition));

                let body_block = self.new_block();
                let after_block = self.new_block();
                self.add_edge(cond_block, body_block);
                self.add_edge(cond_block, after_block);

                self.loops.push(LoopContext {
                    continue_target: cond_block,
                    break_target: after_block,
                    scope_depth: self.scopes.len(),
                });
                self.cur = body_block;
                self.open = true;
                self.visit_block(while_stmt.body);
                if self.open {
                    // Back edge: iterating re-evaluates the condition.
                    self.add_edge(self.cur, cond_block);
                }
                self.loops.pop();

                self.cur = after_block;
                self.open = true;
            }
        }
    }

    /// Emits destructors for every scope the jump abandons and returns the
    /// jump target, or `None` for a break/continue outside any loop.
    fn loop_exit_edges(&mut self, target: impl Fn(&LoopContext) -> BlockId) -> Option<BlockId> {
        let ctx = self.loops.last()?;
        let target = target(ctx);
        let depth = ctx.scope_depth;
        if self.options.add_implicit_dtors {
            let pending: Vec<&'ast VarDecl<'ast>> = self.scopes[depth..]
                .iter()
                .rev()
                .flat_map(|scope| scope.iter().rev().copied())
                .collect();
            for var in pending {
                self.push_element(CfgElement::ImplicitDtor(var));
            }
        }
        Some(target)
    }

    fn emit_scope_dtors(&mut self, scope: &[&'ast VarDecl<'ast>]) {
        for var in scope.iter().rev() {
            self.push_element(CfgElement::ImplicitDtor(var));
        }
    }

    fn compute_reachable(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.blocks.len()];
        let mut visited = FxHashSet::default();
        let mut worklist = vec![self.entry];
        while let Some(id) = worklist.pop() {
            if !visited.insert(id) {
                continue;
            }
            reachable[id.0 as usize] = true;
            for succ in &self.blocks[id.0 as usize].succs {
                worklist.push(*succ);
            }
        }
        reachable
    }
}

/// Record-typed locals with automatic storage get an implicit destructor
/// element at scope exit.
fn needs_implicit_dtor(var: &VarDecl) -> bool {
    matches!(var.storage, StorageClass::Local) && var.ty.non_reference().is_record()
}

/// Whether evaluating the expression materializes a record temporary whose
/// destructor runs at the end of the full expression.
fn creates_record_temporary(expr: &CppExpr) -> bool {
    match expr {
        CppExpr::Call(call) => {
            value_is_record(call.ty) || call.args.iter().any(|arg| creates_record_temporary(arg))
        }
        CppExpr::Construct(construct) => {
            (!construct.implicit && value_is_record(construct.ty))
                || construct.arg.is_some_and(creates_record_temporary)
        }
        CppExpr::ImplicitCast(cast) => creates_record_temporary(cast.inner),
        CppExpr::Binary(binary) => {
            creates_record_temporary(binary.lhs) || creates_record_temporary(binary.rhs)
        }
        _ => false,
    }
}

fn value_is_record(ty: &CppTy) -> bool {
    !ty.is_reference() && ty.is_record()
}
