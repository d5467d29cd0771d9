//! Chained variable scopes as a frame arena.
//!
//! Frames are arena slots addressed by [`FrameId`]; each frame stores
//! its parent's id (or none, for the global frame). Parent links only
//! ever point outward, so there are no back-references and no cycles.
//!
//! An active-frame stack tracks the chain the evaluator is currently
//! inside. Popping removes a frame from the active chain but not from
//! the arena: function values capture their defining frame by id, so
//! popped frames must stay addressable until the evaluator itself is
//! dropped. One evaluator exists per run (the REPL keeps a single one
//! alive across lines), which bounds the arena's lifetime.
//!
//! Within a frame a name is declared at most once, and its slot type
//! is fixed at declaration for the frame's lifetime.

use lute_ir::Name;
use lute_types::{type_eq, Type, TypeTable};
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Handle to a frame in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct FrameId(u32);

impl FrameId {
    /// The global frame, allocated first by `Environment::new`.
    pub const GLOBAL: FrameId = FrameId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One binding slot: the type fixed at declaration plus the current
/// value.
#[derive(Clone, Debug)]
pub struct Slot {
    pub ty: Type,
    pub value: Value,
}

#[derive(Debug, Default)]
struct Frame {
    bindings: FxHashMap<Name, Slot>,
    parent: Option<FrameId>,
}

/// Why an environment operation failed. The evaluator converts these
/// to spanned `EvalError`s; the environment itself stays span-free.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvError {
    DuplicateBinding(Name),
    UndefinedVariable(Name),
    TypeMismatch { expected: Type, found: Type },
    /// The requested depth walked past the global frame. The resolver
    /// makes this unreachable for well-formed depth tables.
    BadDepth { requested: usize },
}

/// The frame arena plus the active chain.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
    /// Entered frames, innermost last. Never empty: the global frame
    /// is pushed at construction and never popped.
    active: Vec<FrameId>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
            active: vec![FrameId::GLOBAL],
        }
    }

    /// The innermost active frame.
    #[inline]
    pub fn current(&self) -> FrameId {
        *self.active.last().unwrap_or(&FrameId::GLOBAL)
    }

    /// Number of active frames (for tests and the debug dump).
    pub fn active_depth(&self) -> usize {
        self.active.len()
    }

    /// Allocate a frame chained to `parent` and enter it. Block and
    /// loop frames chain to [`current`]; call frames chain to the
    /// callee's captured defining frame.
    ///
    /// [`current`]: Environment::current
    pub fn push_frame(&mut self, parent: FrameId) -> FrameId {
        let id = FrameId(u32::try_from(self.frames.len()).unwrap_or(u32::MAX));
        self.frames.push(Frame {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        });
        self.active.push(id);
        id
    }

    /// Leave the innermost frame. The global frame stays.
    pub fn pop_frame(&mut self) {
        if self.active.len() > 1 {
            self.active.pop();
        }
    }

    /// Declare a name in the innermost active frame.
    pub fn declare(&mut self, name: Name, ty: Type, value: Value) -> Result<(), EnvError> {
        let idx = self.current().index();
        let frame = &mut self.frames[idx];
        if frame.bindings.contains_key(&name) {
            return Err(EnvError::DuplicateBinding(name));
        }
        frame.bindings.insert(name, Slot { ty, value });
        Ok(())
    }

    /// Walk exactly `depth` parent links from the current frame.
    fn ancestor(&self, depth: usize) -> Result<FrameId, EnvError> {
        let mut frame = self.current();
        for _ in 0..depth {
            frame = self.frames[frame.index()]
                .parent
                .ok_or(EnvError::BadDepth { requested: depth })?;
        }
        Ok(frame)
    }

    /// Read a variable at a resolved depth.
    pub fn get(&self, name: Name, depth: usize) -> Result<Value, EnvError> {
        let frame = self.ancestor(depth)?;
        self.frames[frame.index()]
            .bindings
            .get(&name)
            .map(|slot| slot.value.clone())
            .ok_or(EnvError::UndefinedVariable(name))
    }

    /// Read a variable from the global frame (unresolved references).
    pub fn get_global(&self, name: Name) -> Result<Value, EnvError> {
        self.frames[FrameId::GLOBAL.index()]
            .bindings
            .get(&name)
            .map(|slot| slot.value.clone())
            .ok_or(EnvError::UndefinedVariable(name))
    }

    /// Replace a variable's value at a resolved depth. The slot's
    /// type was fixed at declaration; the new value must match it
    /// structurally.
    pub fn set(
        &mut self,
        name: Name,
        value: Value,
        depth: usize,
        table: &TypeTable,
    ) -> Result<(), EnvError> {
        let frame = self.ancestor(depth)?;
        Self::set_in(&mut self.frames, frame, name, value, table)
    }

    /// Replace a variable's value in the global frame.
    pub fn set_global(
        &mut self,
        name: Name,
        value: Value,
        table: &TypeTable,
    ) -> Result<(), EnvError> {
        Self::set_in(&mut self.frames, FrameId::GLOBAL, name, value, table)
    }

    fn set_in(
        frames: &mut [Frame],
        frame: FrameId,
        name: Name,
        value: Value,
        table: &TypeTable,
    ) -> Result<(), EnvError> {
        let slot = frames[frame.index()]
            .bindings
            .get_mut(&name)
            .ok_or(EnvError::UndefinedVariable(name))?;
        if !type_eq(&slot.ty, &value.type_of(), table) {
            return Err(EnvError::TypeMismatch {
                expected: slot.ty.clone(),
                found: value.type_of(),
            });
        }
        slot.value = value;
        Ok(())
    }

    /// Declared type of a slot at a resolved depth, if present.
    pub fn slot_type(&self, name: Name, depth: usize) -> Option<Type> {
        let frame = self.ancestor(depth).ok()?;
        self.frames[frame.index()]
            .bindings
            .get(&name)
            .map(|slot| slot.ty.clone())
    }

    /// Declared type of a global slot, if present.
    pub fn slot_type_global(&self, name: Name) -> Option<Type> {
        self.frames[FrameId::GLOBAL.index()]
            .bindings
            .get(&name)
            .map(|slot| slot.ty.clone())
    }

    /// The parent chain from the current frame outward (innermost
    /// first), for the environment dump.
    pub fn chain(&self) -> Vec<FrameId> {
        let mut ids = Vec::new();
        let mut next = Some(self.current());
        while let Some(id) = next {
            ids.push(id);
            next = self.frames[id.index()].parent;
        }
        ids
    }

    /// Bindings of one frame (unordered; callers sort for display).
    pub fn bindings(&self, frame: FrameId) -> impl Iterator<Item = (Name, &Slot)> {
        self.frames[frame.index()]
            .bindings
            .iter()
            .map(|(name, slot)| (*name, slot))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(raw: u32) -> Name {
        Name::from_raw(raw)
    }

    #[test]
    fn declare_then_get_at_depth_zero() {
        let mut env = Environment::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(42)).unwrap();
        assert_eq!(env.get(x, 0).unwrap(), Value::Int(42));
    }

    #[test]
    fn duplicate_declaration_in_one_frame_fails() {
        let mut env = Environment::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(1)).unwrap();
        assert_eq!(
            env.declare(x, Type::Int, Value::Int(2)),
            Err(EnvError::DuplicateBinding(x))
        );
    }

    #[test]
    fn shadowing_in_child_frame_is_allowed() {
        let mut env = Environment::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(1)).unwrap();
        let global = env.current();
        env.push_frame(global);
        env.declare(x, Type::Int, Value::Int(2)).unwrap();
        assert_eq!(env.get(x, 0).unwrap(), Value::Int(2));
        assert_eq!(env.get(x, 1).unwrap(), Value::Int(1));
        env.pop_frame();
        assert_eq!(env.get(x, 0).unwrap(), Value::Int(1));
    }

    #[test]
    fn set_walks_exactly_the_requested_depth() {
        let mut env = Environment::new();
        let table = TypeTable::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(1)).unwrap();
        let global = env.current();
        env.push_frame(global);
        env.set(x, Value::Int(9), 1, &table).unwrap();
        assert_eq!(env.get(x, 1).unwrap(), Value::Int(9));
        // Depth 0 has no binding at all.
        assert_eq!(env.get(x, 0), Err(EnvError::UndefinedVariable(x)));
    }

    #[test]
    fn slot_type_is_fixed_at_declaration() {
        let mut env = Environment::new();
        let table = TypeTable::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(1)).unwrap();

        let err = env.set(x, Value::string("s"), 0, &table).unwrap_err();
        assert_eq!(
            err,
            EnvError::TypeMismatch {
                expected: Type::Int,
                found: Type::Str,
            }
        );

        // A second int is fine and observable.
        env.set(x, Value::Int(7), 0, &table).unwrap();
        assert_eq!(env.get(x, 0).unwrap(), Value::Int(7));
    }

    #[test]
    fn popped_frames_stay_addressable_for_closures() {
        let mut env = Environment::new();
        let x = name(1);
        let global = env.current();
        let inner = env.push_frame(global);
        env.declare(x, Type::Int, Value::Int(5)).unwrap();
        env.pop_frame();

        // The frame left the active chain but its storage persists:
        // entering a call frame chained to it still sees the binding.
        env.push_frame(inner);
        assert_eq!(env.get(x, 1).unwrap(), Value::Int(5));
        env.pop_frame();
    }

    #[test]
    fn global_frame_is_never_popped() {
        let mut env = Environment::new();
        env.pop_frame();
        env.pop_frame();
        assert_eq!(env.current(), FrameId::GLOBAL);
        assert_eq!(env.active_depth(), 1);
    }

    #[test]
    fn bad_depth_is_reported_not_panicked() {
        let env = Environment::new();
        let x = name(1);
        assert_eq!(
            env.get(x, 3),
            Err(EnvError::BadDepth { requested: 3 })
        );
    }

    #[test]
    fn global_fallback_accessors() {
        let mut env = Environment::new();
        let table = TypeTable::new();
        let x = name(1);
        env.declare(x, Type::Int, Value::Int(1)).unwrap();
        let global = env.current();
        env.push_frame(global);
        env.push_frame(env.current());

        assert_eq!(env.get_global(x).unwrap(), Value::Int(1));
        env.set_global(x, Value::Int(2), &table).unwrap();
        assert_eq!(env.get_global(x).unwrap(), Value::Int(2));
        assert_eq!(env.slot_type_global(x), Some(Type::Int));
    }
}
