use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    marker::PhantomData,
    rc::Rc,
};

use super::ty::{
    BoolTy, CharTy, ConstTy, CppTy, CtorKind, FloatTy, IntTy, LvalueRefTy, PointerTy, RecordTy,
    RvalueRefTy, TyId, VoidTy,
};
use super::DeclId;
use bumpalo::Bump;
use rustc_hash::FxHashMap;

/// Allocation backing for everything the frontend hands to the analyzer:
/// AST nodes, interned names, and interned type descriptors. The arena
/// outlives a pass; the analyzer only borrows from it.
pub struct AstArena<'arena> {
    allocator: Rc<Bump>,
    type_arena: TypeArena<'arena>,
    name_arena: NameArena<'arena>,
    next_decl_id: Cell<u32>,
    phantom: PhantomData<&'arena ()>,
}

impl Default for AstArena<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'arena> AstArena<'arena> {
    pub fn new() -> Self {
        let allocator = Rc::new(Bump::new());
        Self {
            type_arena: TypeArena::new(allocator.clone()),
            name_arena: NameArena::new(allocator.clone()),
            allocator,
            next_decl_id: Cell::new(0),
            phantom: PhantomData,
        }
    }

    pub fn intern<T>(&'arena self, v: T) -> &'arena mut T {
        self.allocator.alloc(v)
    }

    pub fn names(&'arena self) -> &'arena NameArena<'arena> {
        &self.name_arena
    }

    pub fn types(&'arena self) -> &'arena TypeArena<'arena> {
        &self.type_arena
    }

    /// Hands out the next declaration id. Ids are unique per arena, which
    /// makes them unique per translation unit.
    pub fn fresh_decl_id(&self) -> DeclId {
        let id = self.next_decl_id.get();
        self.next_decl_id.set(id + 1);
        DeclId(id)
    }
}

pub struct NameArena<'arena> {
    allocator: Rc<Bump>,
    intern: RefCell<HashSet<&'arena str>>,
}

impl<'arena> NameArena<'arena> {
    pub fn new(allocator: Rc<Bump>) -> Self {
        Self {
            allocator,
            intern: RefCell::new(HashSet::new()),
        }
    }

    pub fn get(&'arena self, name: &str) -> &'arena str {
        if let Some(interned) = self.intern.borrow().get(name) {
            return interned;
        }
        let id = self.allocator.alloc_str(name);
        self.intern.borrow_mut().insert(id);
        id
    }
}

pub struct TypeArena<'arena> {
    allocator: Rc<Bump>,
    intern: RefCell<FxHashMap<TyId, &'arena CppTy<'arena>>>,
}

impl<'arena> TypeArena<'arena> {
    pub fn new(allocator: Rc<Bump>) -> Self {
        Self {
            allocator,
            intern: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn get_void_ty(&'arena self) -> &'arena CppTy<'arena> {
        let id = TyId::compute_void_ty_id();
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Void(VoidTy {})))
    }

    pub fn get_bool_ty(&'arena self) -> &'arena CppTy<'arena> {
        let id = TyId::compute_bool_ty_id();
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Bool(BoolTy {})))
    }

    pub fn get_int_ty(&'arena self) -> &'arena CppTy<'arena> {
        let id = TyId::compute_int_ty_id();
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Int(IntTy {})))
    }

    pub fn get_float_ty(&'arena self) -> &'arena CppTy<'arena> {
        let id = TyId::compute_float_ty_id();
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Float(FloatTy {})))
    }

    pub fn get_char_ty(&'arena self) -> &'arena CppTy<'arena> {
        let id = TyId::compute_char_ty_id();
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Char(CharTy {})))
    }

    /// Records are interned by name; the first registration of a name fixes
    /// its constructor inventory for the unit.
    pub fn get_record_ty(
        &'arena self,
        name: &'arena str,
        ctors: Vec<CtorKind>,
    ) -> &'arena CppTy<'arena> {
        let id = TyId::compute_record_ty_id(name);
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Record(RecordTy { name, ctors })))
    }

    pub fn get_pointer_ty(&'arena self, inner: &'arena CppTy<'arena>) -> &'arena CppTy<'arena> {
        let id = TyId::compute_pointer_ty_id(&TyId::from(inner));
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Pointer(PointerTy { inner })))
    }

    pub fn get_lvalue_ref_ty(&'arena self, inner: &'arena CppTy<'arena>) -> &'arena CppTy<'arena> {
        let id = TyId::compute_lvalue_ref_ty_id(&TyId::from(inner));
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::LvalueRef(LvalueRefTy { inner })))
    }

    pub fn get_rvalue_ref_ty(&'arena self, inner: &'arena CppTy<'arena>) -> &'arena CppTy<'arena> {
        let id = TyId::compute_rvalue_ref_ty_id(&TyId::from(inner));
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::RvalueRef(RvalueRefTy { inner })))
    }

    pub fn get_const_ty(&'arena self, inner: &'arena CppTy<'arena>) -> &'arena CppTy<'arena> {
        let id = TyId::compute_const_ty_id(&TyId::from(inner));
        self.intern
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.allocator.alloc(CppTy::Const(ConstTy { inner })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_are_interned_once() {
        let arena = AstArena::new();
        let a = arena.types().get_int_ty();
        let b = arena.types().get_int_ty();
        assert!(std::ptr::eq(a, b));

        let name = arena.names().get("StringLike");
        let r1 = arena
            .types()
            .get_record_ty(name, vec![CtorKind::Copy, CtorKind::Move]);
        let r2 = arena.types().get_record_ty(name, vec![CtorKind::Copy]);
        assert!(std::ptr::eq(r1, r2));
    }

    #[test]
    fn decl_ids_are_sequential() {
        let arena = AstArena::new();
        assert_eq!(arena.fresh_decl_id(), DeclId(0));
        assert_eq!(arena.fresh_decl_id(), DeclId(1));
    }
}
