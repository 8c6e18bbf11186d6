//=========================================================================
// Object Node
//=========================================================================
//
// A game object plus its destroy flag and child nodes.
//
// Tree walks (all pre-order, parent before children):
//   update_tree()  → skips destroyed nodes and their subtrees
//   render_tree()  → renders live nodes, evicts destroyed children
//   wakeup_tree()  → visits every node, destroyed or not
//   destroy_tree() → destroys the node and its whole subtree
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{GameObject, ObjectContext, ObjectError};
use crate::core::error::{HookResult, Phase};
use crate::core::render::RendererBucket;
use crate::core::state::{Context, WakeArgs};

//=== ObjectNode ==========================================================

/// A node in a state's object tree.
///
/// Destruction is lazy: [`destroy`](Self::destroy) only raises a flag.
/// The node stops updating immediately and is removed and destroyed by
/// the next render walk of whatever owns it.
pub struct ObjectNode {
    object: Box<dyn GameObject>,
    destroyed: bool,
    children: Vec<ObjectNode>,
}

impl ObjectNode {
    //--- Construction -----------------------------------------------------

    pub fn new(object: impl GameObject + 'static) -> Self {
        Self::from_box(Box::new(object))
    }

    pub fn from_box(object: Box<dyn GameObject>) -> Self {
        Self {
            object,
            destroyed: false,
            children: Vec::new(),
        }
    }

    /// Builder-style child insertion.
    pub fn with_child(mut self, child: ObjectNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: ObjectNode) {
        self.children.push(child);
    }

    //--- Destruction ------------------------------------------------------

    /// Flags this node and its subtree for destruction.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    //--- Query API --------------------------------------------------------

    pub fn object(&self) -> &dyn GameObject {
        self.object.as_ref()
    }

    pub fn object_mut(&mut self) -> &mut dyn GameObject {
        self.object.as_mut()
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }

    pub fn children(&self) -> &[ObjectNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ObjectNode] {
        &mut self.children
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ObjectNode::subtree_len).sum::<usize>()
    }

    //--- Tree Walks -------------------------------------------------------

    pub(crate) fn update_tree(&mut self, ctx: &mut Context<'_>) -> HookResult {
        if self.destroyed {
            return Ok(());
        }

        {
            let mut octx = ObjectContext::new(ctx, &mut self.destroyed, &mut self.children);
            self.object
                .update(&mut octx)
                .map_err(|e| ObjectError::wrap(self.object.name(), Phase::Update, e))?;
        }

        // Flagged during its own update: the subtree is already out.
        if self.destroyed {
            return Ok(());
        }

        for child in &mut self.children {
            child.update_tree(ctx)?;
        }

        Ok(())
    }

    /// Renders this live node, then its children, evicting destroyed ones.
    pub(crate) fn render_tree(
        &mut self,
        ctx: &mut Context<'_>,
        bucket: &mut RendererBucket,
    ) -> HookResult {
        {
            let mut octx = ObjectContext::new(ctx, &mut self.destroyed, &mut self.children);
            self.object
                .render(&mut octx, bucket)
                .map_err(|e| ObjectError::wrap(self.object.name(), Phase::Render, e))?;
        }

        let mut i = 0;
        while i < self.children.len() {
            if self.children[i].destroyed {
                let mut evicted = self.children.remove(i);
                debug!(target: "object", "Evicting {} from {}", evicted.name(), self.object.name());
                evicted.destroy_tree(ctx)?;
            } else {
                self.children[i].render_tree(ctx, bucket)?;
                i += 1;
            }
        }

        Ok(())
    }

    pub(crate) fn wakeup_tree(&mut self, ctx: &mut Context<'_>, args: &WakeArgs) -> HookResult {
        {
            let mut octx = ObjectContext::new(ctx, &mut self.destroyed, &mut self.children);
            self.object
                .wakeup(&mut octx, args)
                .map_err(|e| ObjectError::wrap(self.object.name(), Phase::Wakeup, e))?;
        }

        for child in &mut self.children {
            child.wakeup_tree(ctx, args)?;
        }

        Ok(())
    }

    /// Destroys this node, then every descendant, and drops the children.
    ///
    /// Every node is destroyed even if one fails; the first error is returned.
    pub(crate) fn destroy_tree(&mut self, ctx: &mut Context<'_>) -> HookResult {
        self.destroyed = true;
        let mut first_error = self
            .object
            .destroy(ctx)
            .map_err(|e| ObjectError::wrap(self.object.name(), Phase::Destroy, e))
            .err();

        for mut child in self.children.drain(..) {
            if let Err(e) = child.destroy_tree(ctx) {
                warn!(target: "object", "Destroying {} under {} failed: {}", child.name(), self.object.name(), e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectNode")
            .field("object", &self.object.name())
            .field("destroyed", &self.destroyed)
            .field("children", &self.children)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ComponentRegistry;
    use crate::core::state::TransitionSlot;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Tracer {
        name: &'static str,
        log: Log,
        destroy_on_update: bool,
        spawn_on_update: Option<&'static str>,
    }

    impl Tracer {
        fn node(name: &'static str, log: &Log) -> ObjectNode {
            ObjectNode::new(Self {
                name,
                log: Rc::clone(log),
                destroy_on_update: false,
                spawn_on_update: None,
            })
        }
    }

    impl GameObject for Tracer {
        fn update(&mut self, ctx: &mut ObjectContext<'_, '_>) -> HookResult {
            self.log.borrow_mut().push(format!("{}.update", self.name));
            if self.destroy_on_update {
                ctx.destroy();
            }
            if let Some(child) = self.spawn_on_update.take() {
                ctx.spawn(Tracer::node(child, &self.log));
            }
            Ok(())
        }

        fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, _bucket: &mut RendererBucket) -> HookResult {
            self.log.borrow_mut().push(format!("{}.render", self.name));
            Ok(())
        }

        fn wakeup(&mut self, _ctx: &mut ObjectContext<'_, '_>, _args: &WakeArgs) -> HookResult {
            self.log.borrow_mut().push(format!("{}.wakeup", self.name));
            Ok(())
        }

        fn destroy(&mut self, _ctx: &mut Context<'_>) -> HookResult {
            self.log.borrow_mut().push(format!("{}.destroy", self.name));
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn with_context<R>(f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let mut components = ComponentRegistry::new();
        let mut slot = TransitionSlot::new();
        let mut ctx = Context::new(&mut components, &mut slot, Duration::ZERO, 0);
        f(&mut ctx)
    }

    #[test]
    fn update_is_pre_order() {
        let log = Log::default();
        let mut root = Tracer::node("root", &log)
            .with_child(Tracer::node("a", &log).with_child(Tracer::node("a1", &log)))
            .with_child(Tracer::node("b", &log));

        with_context(|ctx| root.update_tree(ctx)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["root.update", "a.update", "a1.update", "b.update"]
        );
        assert_eq!(root.subtree_len(), 4);
    }

    #[test]
    fn destroyed_child_skips_its_subtree_on_update() {
        let log = Log::default();
        let mut root = Tracer::node("root", &log)
            .with_child(Tracer::node("a", &log).with_child(Tracer::node("a1", &log)))
            .with_child(Tracer::node("b", &log));
        root.children_mut()[0].destroy();

        with_context(|ctx| root.update_tree(ctx)).unwrap();

        assert_eq!(*log.borrow(), vec!["root.update", "b.update"]);
    }

    #[test]
    fn render_evicts_destroyed_children_once() {
        let log = Log::default();
        let mut root = Tracer::node("root", &log)
            .with_child(Tracer::node("a", &log).with_child(Tracer::node("a1", &log)))
            .with_child(Tracer::node("b", &log));
        root.children_mut()[0].destroy();

        let mut bucket = RendererBucket::new();
        with_context(|ctx| root.render_tree(ctx, &mut bucket)).unwrap();
        with_context(|ctx| root.render_tree(ctx, &mut bucket)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "root.render",
                "a.destroy",
                "a1.destroy",
                "b.render",
                "root.render",
                "b.render",
            ]
        );
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn self_destroy_during_update_skips_children_that_pass() {
        let log = Log::default();
        let mut root = ObjectNode::new(Tracer {
            name: "root",
            log: Rc::clone(&log),
            destroy_on_update: true,
            spawn_on_update: None,
        })
        .with_child(Tracer::node("child", &log));

        with_context(|ctx| root.update_tree(ctx)).unwrap();

        assert!(root.is_destroyed());
        assert_eq!(*log.borrow(), vec!["root.update"]);
    }

    #[test]
    fn spawned_child_joins_the_same_walk() {
        let log = Log::default();
        let mut root = ObjectNode::new(Tracer {
            name: "root",
            log: Rc::clone(&log),
            destroy_on_update: false,
            spawn_on_update: Some("spawned"),
        });

        with_context(|ctx| root.update_tree(ctx)).unwrap();

        assert_eq!(*log.borrow(), vec!["root.update", "spawned.update"]);
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn wakeup_reaches_destroyed_nodes() {
        let log = Log::default();
        let mut root = Tracer::node("root", &log).with_child(Tracer::node("gone", &log));
        root.children_mut()[0].destroy();

        with_context(|ctx| root.wakeup_tree(ctx, &WakeArgs::new())).unwrap();

        assert_eq!(*log.borrow(), vec!["root.wakeup", "gone.wakeup"]);
    }

    #[test]
    fn destroy_tree_keeps_going_past_a_failing_child() {
        struct Faulty(Log);

        impl GameObject for Faulty {
            fn update(&mut self, _ctx: &mut ObjectContext<'_, '_>) -> HookResult {
                Ok(())
            }

            fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, _bucket: &mut RendererBucket) -> HookResult {
                Ok(())
            }

            fn destroy(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                self.0.borrow_mut().push("faulty.destroy".to_string());
                Err("stuck in the wall".into())
            }

            fn name(&self) -> &str {
                "Faulty"
            }
        }

        let log = Log::default();
        let mut root = Tracer::node("root", &log)
            .with_child(Tracer::node("a", &log))
            .with_child(ObjectNode::new(Faulty(Rc::clone(&log))).with_child(Tracer::node("f1", &log)))
            .with_child(Tracer::node("b", &log).with_child(Tracer::node("b1", &log)));

        let err = with_context(|ctx| root.destroy_tree(ctx)).unwrap_err();

        assert!(err.to_string().contains("Faulty"));
        assert_eq!(
            *log.borrow(),
            vec![
                "root.destroy",
                "a.destroy",
                "faulty.destroy",
                "f1.destroy",
                "b.destroy",
                "b1.destroy",
            ]
        );
        assert!(root.children().is_empty());
    }

    #[test]
    fn object_errors_carry_the_object_name() {
        struct Broken;

        impl GameObject for Broken {
            fn update(&mut self, _ctx: &mut ObjectContext<'_, '_>) -> HookResult {
                Err("no fuel".into())
            }

            fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, _bucket: &mut RendererBucket) -> HookResult {
                Ok(())
            }

            fn name(&self) -> &str {
                "Broken"
            }
        }

        let mut node = ObjectNode::new(Broken);
        let err = with_context(|ctx| node.update_tree(ctx)).unwrap_err();

        let text = err.to_string();
        assert!(text.contains("update hook of object `Broken`"));
        assert!(text.contains("no fuel"));
    }
}
