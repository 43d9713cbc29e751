//! Models
//!
//! A [`ModelClass`] is a validated, layered set of property declarations,
//! built once and shared by every instance. A [`Model`] is one instance: a
//! value store, a propagation queue, and its subscribers.
//!
//! # Propagation
//!
//! Every mutation runs one propagation cycle to completion before
//! returning:
//!
//! 1. **Gate**: the new value is compared to the stored one with the
//!    property's comparator. Equal values stop here.
//! 2. **Seed**: the value is committed and each direct dependent is
//!    enqueued unless already pending.
//! 3. **Order**: the queue stays sorted by depth.
//! 4. **Drain**: the shallowest pending property is recomputed from the
//!    current values of its dependencies and goes through 1 and 2 itself,
//!    until the queue is empty.
//!
//! A property is enqueued only by a shallower property, and the queue is
//! drained shallowest first, so each property is recomputed at most once
//! per cycle no matter how many paths lead to it.
//!
//! # Failure
//!
//! A failing compute function aborts the drain. The failing property keeps
//! its last committed value; properties committed earlier in the cycle keep
//! their new values. There is no rollback across the graph.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tokio::sync::mpsc;
use tracing::{debug, debug_span, trace, warn};

use super::context::ComputeContext;
use super::sender::{ModelSender, PendingSet};
use super::store::ValueStore;
use super::subscriber::{ChangeSet, SubscriberList, Subscription};
use crate::config::EngineConfig;
use crate::error::{EngineError, InvalidOperation, Result};
use crate::graph::{DefinitionSet, Graph, PropagationQueue, PropertyId, PropertyKind};
use crate::snapshot::Snapshot;
use crate::value::Value;

struct ClassInner {
    name: String,
    definitions: DefinitionSet,
    graph: Graph,
    config: EngineConfig,
}

/// A built model class. Cheap to clone; all clones share one graph.
#[derive(Clone)]
pub struct ModelClass {
    inner: Arc<ClassInner>,
}

impl ModelClass {
    /// Validate `definitions` and build the dependency graph.
    pub fn build(name: impl Into<String>, definitions: DefinitionSet) -> Result<Self> {
        Self::build_with_config(name, definitions, EngineConfig::default())
    }

    pub fn build_with_config(
        name: impl Into<String>,
        definitions: DefinitionSet,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let name = name.into();
        let graph = Graph::build(&definitions)?;
        debug!(class = %name, properties = graph.len(), "defined model class");

        Ok(Self {
            inner: Arc::new(ClassInner {
                name,
                definitions,
                graph,
                config,
            }),
        })
    }

    /// Build a derived class: every property of `self` plus `overrides`.
    ///
    /// An override must keep the kind of the property it replaces.
    pub fn extend(&self, name: impl Into<String>, overrides: DefinitionSet) -> Result<Self> {
        let mut definitions = self.inner.definitions.derive();
        definitions.merge(overrides);
        Self::build_with_config(name, definitions, self.inner.config.clone())
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn definitions(&self) -> &DefinitionSet {
        &self.inner.definitions
    }

    pub fn graph(&self) -> &Graph {
        &self.inner.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Create an instance.
    pub fn instantiate(&self) -> Result<Model> {
        Model::new(self.clone())
    }

    /// Whether two handles refer to the same built class.
    pub fn same_class(&self, other: &ModelClass) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.inner.name)
            .field("properties", &self.inner.graph.len())
            .field("layers", &self.inner.graph.layers().len())
            .finish()
    }
}

/// What started a propagation cycle.
enum Trigger {
    Assign(Value),
    Recompute,
}

/// Bookkeeping for one propagation cycle.
struct Cycle {
    changed: Vec<PropertyId>,
    recomputes: usize,
    limit: usize,
}

impl Cycle {
    fn new(limit: usize) -> Self {
        Self {
            changed: Vec::new(),
            recomputes: 0,
            limit,
        }
    }

    fn record(&mut self, id: PropertyId) {
        if !self.changed.contains(&id) {
            self.changed.push(id);
        }
    }

    fn count_recompute(&mut self) -> Result<()> {
        self.recomputes += 1;
        if self.recomputes > self.limit {
            return Err(EngineError::PropagationLimit { limit: self.limit });
        }
        Ok(())
    }
}

/// One instance of a model class.
pub struct Model {
    class: ModelClass,
    store: ValueStore,
    queue: PropagationQueue,
    subscribers: SubscriberList,
    pending_tx: mpsc::UnboundedSender<PendingSet>,
    pending_rx: mpsc::UnboundedReceiver<PendingSet>,
}

impl Model {
    /// Seed fundamentals and evaluate computed properties in layer order.
    ///
    /// Assignments requested by compute functions during construction are
    /// applied afterwards, each as a regular propagation cycle.
    pub fn new(class: ModelClass) -> Result<Self> {
        let graph = class.graph();
        let (pending_tx, pending_rx) = mpsc::unbounded_channel();
        let mut model = Self {
            store: ValueStore::with_len(graph.len()),
            queue: PropagationQueue::with_len(graph.len()),
            subscribers: SubscriberList::default(),
            pending_tx,
            pending_rx,
            class: class.clone(),
        };

        let mut deferred = Vec::new();
        for id in graph.evaluation_order() {
            let value = match graph.node(id).initial() {
                Some(initial) => initial.resolve(),
                None => {
                    let (value, nested) = model.evaluate(id)?;
                    deferred.extend(nested);
                    value
                }
            };
            model.store.replace(id, value);
        }

        for (name, value) in deferred {
            model.set(&name, value)?;
        }
        Ok(model)
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn id_of(&self, name: &str) -> Option<PropertyId> {
        self.class.graph().id_of(name)
    }

    /// Current value of `name`. Never recomputes.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let id = self
            .id_of(name)
            .ok_or_else(|| EngineError::UnknownProperty(name.to_owned()))?;
        Ok(&self.store[id])
    }

    pub fn get_by_id(&self, id: PropertyId) -> Option<&Value> {
        self.store.get(id)
    }

    /// Assign a fundamental property and propagate the change.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let id = self.assignable(name)?;
        self.propagate(id, Trigger::Assign(value.into()))
    }

    /// Recompute a computed property whose inputs changed outside the
    /// model, and propagate if its value changed.
    pub fn invalidate(&mut self, name: &str) -> Result<()> {
        let node = self
            .class
            .graph()
            .get(name)
            .ok_or_else(|| EngineError::UnknownProperty(name.to_owned()))?;
        if node.kind() == PropertyKind::Fundamental {
            return Err(InvalidOperation::InvalidateFundamental(name.to_owned()).into());
        }
        let id = node.id();
        self.propagate(id, Trigger::Recompute)
    }

    /// Call `callback` once per propagation cycle in which any of `names`
    /// changed.
    pub fn on_change<F>(&self, names: &[&str], callback: F) -> Result<Subscription>
    where
        F: Fn(&Model, &ChangeSet) + Send + Sync + 'static,
    {
        let watched = names
            .iter()
            .map(|name| {
                self.id_of(name)
                    .ok_or_else(|| EngineError::UnknownProperty((*name).to_owned()))
            })
            .collect::<Result<SmallVec<[PropertyId; 4]>>>()?;
        Ok(self.subscribers.add(watched, Arc::new(callback)))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Handle for queueing assignments from other tasks or threads.
    pub fn sender(&self) -> ModelSender {
        ModelSender::new(self.pending_tx.clone())
    }

    /// Apply every queued assignment, in order, one cycle each.
    ///
    /// Stops at the first failing assignment; later ones stay queued.
    pub fn apply_pending(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Ok(PendingSet { name, value }) = self.pending_rx.try_recv() {
            self.set(&name, value)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Every property value, in declaration order.
    pub fn snapshot(&self) -> Snapshot {
        self.class
            .graph()
            .nodes()
            .map(|node| (node.name().to_owned(), self.store[node.id()].clone()))
            .collect()
    }

    fn assignable(&self, name: &str) -> Result<PropertyId> {
        let node = self
            .class
            .graph()
            .get(name)
            .ok_or_else(|| EngineError::UnknownProperty(name.to_owned()))?;
        match node.kind() {
            PropertyKind::Computed => Err(InvalidOperation::SetComputed(name.to_owned()).into()),
            PropertyKind::Fundamental if node.is_read_only() => {
                Err(InvalidOperation::SetReadOnly(name.to_owned()).into())
            }
            PropertyKind::Fundamental => Ok(node.id()),
        }
    }

    fn propagate(&mut self, id: PropertyId, trigger: Trigger) -> Result<()> {
        let class = self.class.clone();
        let graph = class.graph();
        let _span = debug_span!(
            "propagate",
            class = class.name(),
            property = graph.node(id).name()
        )
        .entered();

        let mut cycle = Cycle::new(class.config().max_recomputes_per_cycle);
        let result = self.run_cycle(graph, id, trigger, &mut cycle);
        self.queue.clear();

        if let Err(err) = &result {
            warn!(error = %err, committed = cycle.changed.len(), "propagation aborted");
        } else {
            debug!(
                changed = cycle.changed.len(),
                recomputes = cycle.recomputes,
                "propagation settled"
            );
        }

        if result.is_ok() || class.config().notify_on_error {
            self.notify(graph, cycle.changed);
        }
        result
    }

    fn run_cycle(
        &mut self,
        graph: &Graph,
        id: PropertyId,
        trigger: Trigger,
        cycle: &mut Cycle,
    ) -> Result<()> {
        match trigger {
            Trigger::Assign(value) => {
                self.commit(graph, id, value, cycle);
            }
            Trigger::Recompute => self.recompute(graph, id, cycle)?,
        }
        while let Some(next) = self.queue.pop() {
            self.recompute(graph, next, cycle)?;
        }
        Ok(())
    }

    fn recompute(&mut self, graph: &Graph, id: PropertyId, cycle: &mut Cycle) -> Result<()> {
        cycle.count_recompute()?;
        let (value, nested) = self.evaluate(id)?;
        self.commit(graph, id, value, cycle);
        for (name, value) in nested {
            let target = self.assignable(&name)?;
            trace!(from = graph.node(id).name(), to = %name, "nested assignment");
            self.commit(graph, target, value, cycle);
        }
        Ok(())
    }

    /// Run the compute function of `id` against the current store.
    fn evaluate(&self, id: PropertyId) -> Result<(Value, Vec<(String, Value)>)> {
        let node = self.class.graph().node(id);
        let Some(compute) = node.compute() else {
            return Err(InvalidOperation::InvalidateFundamental(node.name().to_owned()).into());
        };

        let inputs: SmallVec<[&Value; 4]> = node
            .dependencies()
            .iter()
            .map(|&dep| &self.store[dep])
            .collect();
        let ctx = ComputeContext::new(node.name(), &inputs);

        trace!(property = node.name(), depth = node.depth(), "recompute");
        let value = compute(&ctx).map_err(|source| EngineError::Compute {
            property: node.name().to_owned(),
            source,
        })?;
        Ok((value, ctx.into_deferred()))
    }

    /// Gate, write and seed. Returns whether the value changed.
    fn commit(&mut self, graph: &Graph, id: PropertyId, value: Value, cycle: &mut Cycle) -> bool {
        let node = graph.node(id);
        if (node.comparator())(&self.store[id], &value) {
            trace!(property = node.name(), "unchanged");
            return false;
        }

        self.store.replace(id, value);
        cycle.record(id);
        for &dependent in node.dependents() {
            if self.queue.push(dependent, graph.node(dependent).depth()) {
                trace!(property = graph.node(dependent).name(), "enqueued");
            }
        }
        true
    }

    fn notify(&self, graph: &Graph, changed: Vec<PropertyId>) {
        if changed.is_empty() {
            return;
        }
        let names = changed
            .iter()
            .map(|&id| graph.node(id).name().to_owned())
            .collect();
        let changes = ChangeSet::new(changed, names);
        for callback in self.subscribers.interested(&changes) {
            callback(self, &changes);
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("class", &self.class.name())
            .field("values", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ComputeError, DeclarationError};
    use crate::graph::PropertyDefinition;
    use crate::value::ValueType;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Per-property recompute log shared with compute closures.
    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl Log {
        fn push(&self, name: &str) {
            self.0.lock().push(name.to_owned());
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock())
        }
    }

    fn sum(log: &Log, name: &'static str, deps: &[&str]) -> PropertyDefinition {
        let log = log.clone();
        PropertyDefinition::computed(name, ValueType::Number, deps.to_vec(), move |ctx| {
            log.push(name);
            let mut total = 0;
            for i in 0..ctx.inputs().len() {
                total += ctx.int(i)?;
            }
            Ok(Value::Int(total))
        })
    }

    fn diamond(log: &Log) -> ModelClass {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("a", ValueType::Number, 1))
            .define(sum(log, "b", &["a"]))
            .define(sum(log, "c", &["a", "a"]))
            .define(sum(log, "d", &["b", "c"]));
        ModelClass::build("Diamond", defs).unwrap()
    }

    #[test]
    fn construction_evaluates_in_layer_order() {
        let log = Log::default();
        let model = diamond(&log).instantiate().unwrap();

        assert_eq!(model.get("b").unwrap(), &Value::Int(1));
        assert_eq!(model.get("c").unwrap(), &Value::Int(2));
        assert_eq!(model.get("d").unwrap(), &Value::Int(3));
        let order = log.take();
        assert_eq!(order.last().map(String::as_str), Some("d"));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn diamond_recomputes_each_property_once() {
        let log = Log::default();
        let mut model = diamond(&log).instantiate().unwrap();
        log.take();

        model.set("a", 10).unwrap();

        let mut order = log.take();
        assert_eq!(order.len(), 3);
        assert_eq!(order.pop().as_deref(), Some("d"));
        order.sort();
        assert_eq!(order, ["b", "c"]);
        assert_eq!(model.get("d").unwrap(), &Value::Int(30));
    }

    #[test]
    fn equal_assignment_is_a_no_op() {
        let log = Log::default();
        let mut model = diamond(&log).instantiate().unwrap();
        log.take();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _sub = model
            .on_change(&["a", "d"], move |_, _| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        model.set("a", 1).unwrap();
        assert!(log.take().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unchanged_computed_value_stops_fan_out() {
        let log = Log::default();
        let parity_log = log.clone();
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("n", ValueType::Number, 2))
            .define(PropertyDefinition::computed(
                "parity",
                ValueType::Number,
                ["n"],
                move |ctx| {
                    parity_log.push("parity");
                    Ok(Value::Int(ctx.int(0)? % 2))
                },
            ))
            .define(sum(&log, "after", &["parity"]));
        let mut model = ModelClass::build("Parity", defs).unwrap().instantiate().unwrap();
        log.take();

        model.set("n", 4).unwrap();
        assert_eq!(log.take(), ["parity"]);

        model.set("n", 5).unwrap();
        assert_eq!(log.take(), ["parity", "after"]);
    }

    #[test]
    fn set_rejects_computed_unknown_and_read_only() {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("fixed", ValueType::Any, 1).read_only())
            .define(PropertyDefinition::computed("c", ValueType::Any, ["fixed"], |ctx| {
                Ok(ctx.input(0).clone())
            }));
        let mut model = ModelClass::build("Guarded", defs).unwrap().instantiate().unwrap();

        assert!(matches!(
            model.set("c", 5),
            Err(EngineError::InvalidOperation(InvalidOperation::SetComputed(_)))
        ));
        assert!(matches!(
            model.set("fixed", 5),
            Err(EngineError::InvalidOperation(InvalidOperation::SetReadOnly(_)))
        ));
        assert!(matches!(
            model.set("nope", 5),
            Err(EngineError::UnknownProperty(_))
        ));
        assert_eq!(model.get("c").unwrap(), &Value::Int(1));
    }

    #[test]
    fn compute_failure_keeps_earlier_commits() {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("x", ValueType::Number, 1))
            .define(PropertyDefinition::computed("copy", ValueType::Number, ["x"], |ctx| {
                Ok(Value::Int(ctx.int(0)?))
            }))
            .define(PropertyDefinition::computed(
                "inverse",
                ValueType::Number,
                ["copy"],
                |ctx| {
                    let x = ctx.int(0)?;
                    if x == 0 {
                        return Err(ComputeError::new("division by zero"));
                    }
                    Ok(Value::Int(100 / x))
                },
            ));
        let mut model = ModelClass::build("Fragile", defs).unwrap().instantiate().unwrap();

        let err = model.set("x", 0).unwrap_err();
        match err {
            EngineError::Compute { property, .. } => assert_eq!(property, "inverse"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(model.get("x").unwrap(), &Value::Int(0));
        assert_eq!(model.get("copy").unwrap(), &Value::Int(0));
        assert_eq!(model.get("inverse").unwrap(), &Value::Int(100));

        // The queue is idle again; a good value goes through.
        model.set("x", 4).unwrap();
        assert_eq!(model.get("inverse").unwrap(), &Value::Int(25));
    }

    #[test]
    fn invalidate_recomputes_external_inputs() {
        let external = Arc::new(AtomicUsize::new(1));
        let source = external.clone();
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("unused", ValueType::Any, ()))
            .define(PropertyDefinition::computed(
                "children",
                ValueType::Number,
                Vec::<String>::new(),
                move |_| Ok(Value::Int(source.load(Ordering::SeqCst) as i64)),
            ))
            .define(PropertyDefinition::computed(
                "label",
                ValueType::String,
                ["children"],
                |ctx| Ok(Value::Str(format!("{} events", ctx.int(0)?))),
            ));
        let mut model = ModelClass::build("External", defs).unwrap().instantiate().unwrap();
        assert_eq!(model.get("label").unwrap(), &Value::from("1 events"));

        external.store(3, Ordering::SeqCst);
        assert_eq!(model.get("label").unwrap(), &Value::from("1 events"));
        model.invalidate("children").unwrap();
        assert_eq!(model.get("label").unwrap(), &Value::from("3 events"));

        assert!(matches!(
            model.invalidate("unused"),
            Err(EngineError::InvalidOperation(InvalidOperation::InvalidateFundamental(_)))
        ));
    }

    #[test]
    fn nested_assignment_joins_the_drain() {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("input", ValueType::Number, 0))
            .define(PropertyDefinition::fundamental("audit", ValueType::Number, 0))
            .define(PropertyDefinition::computed(
                "doubled",
                ValueType::Number,
                ["input"],
                |ctx| {
                    let doubled = ctx.int(0)? * 2;
                    ctx.set("audit", doubled + 1);
                    Ok(Value::Int(doubled))
                },
            ))
            .define(PropertyDefinition::computed(
                "audit_view",
                ValueType::Number,
                ["audit"],
                |ctx| Ok(Value::Int(ctx.int(0)?)),
            ));
        let mut model = ModelClass::build("Nested", defs).unwrap().instantiate().unwrap();
        assert_eq!(model.get("audit_view").unwrap(), &Value::Int(1));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = model
            .on_change(&["audit_view"], move |_, changes| {
                seen_clone.lock().push(changes.names().map(str::to_owned).collect::<Vec<_>>());
            })
            .unwrap();

        model.set("input", 5).unwrap();
        assert_eq!(model.get("doubled").unwrap(), &Value::Int(10));
        assert_eq!(model.get("audit").unwrap(), &Value::Int(11));
        assert_eq!(model.get("audit_view").unwrap(), &Value::Int(11));
        assert_eq!(
            *seen.lock(),
            [vec!["input", "doubled", "audit", "audit_view"]]
        );
    }

    #[test]
    fn runaway_feedback_hits_the_limit() {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("tick", ValueType::Number, 0))
            .define(PropertyDefinition::computed(
                "next",
                ValueType::Number,
                ["tick"],
                |ctx| {
                    let tick = ctx.int(0)?;
                    if tick > 0 {
                        ctx.set("tick", tick + 1);
                    }
                    Ok(Value::Int(tick))
                },
            ));
        let config = EngineConfig {
            max_recomputes_per_cycle: 50,
            ..EngineConfig::default()
        };
        let class = ModelClass::build_with_config("Loop", defs, config).unwrap();
        let mut model = class.instantiate().unwrap();

        assert!(matches!(
            model.set("tick", 1),
            Err(EngineError::PropagationLimit { limit: 50 })
        ));
    }

    #[test]
    fn notify_on_error_can_be_disabled() {
        let defs = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("x", ValueType::Number, 1))
            .define(PropertyDefinition::computed("bad", ValueType::Number, ["x"], |ctx| {
                match ctx.int(0)? {
                    1 => Ok(Value::Int(1)),
                    _ => Err(ComputeError::new("only one")),
                }
            }));
        let config = EngineConfig {
            notify_on_error: false,
            ..EngineConfig::default()
        };
        let mut model = ModelClass::build_with_config("Quiet", defs, config)
            .unwrap()
            .instantiate()
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _sub = model
            .on_change(&["x"], move |_, _| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(model.set("x", 2).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.get("x").unwrap(), &Value::Int(2));
    }

    #[test]
    fn on_change_rejects_unknown_names() {
        let model = diamond(&Log::default()).instantiate().unwrap();
        assert!(matches!(
            model.on_change(&["a", "zzz"], |_, _| {}),
            Err(EngineError::UnknownProperty(name)) if name == "zzz"
        ));
        assert_eq!(model.subscriber_count(), 0);
    }

    #[test]
    fn extend_rejects_kind_change() {
        let base = diamond(&Log::default());
        let overrides = DefinitionSet::new()
            .define(PropertyDefinition::fundamental("b", ValueType::Number, 7));

        assert!(matches!(
            base.extend("Broken", overrides),
            Err(EngineError::Declaration(DeclarationError::KindOverride { .. }))
        ));
    }

    #[test]
    fn instances_share_the_class_graph() {
        let class = diamond(&Log::default());
        let mut first = class.instantiate().unwrap();
        let second = class.instantiate().unwrap();

        first.set("a", 5).unwrap();
        assert_eq!(first.get("d").unwrap(), &Value::Int(15));
        assert_eq!(second.get("d").unwrap(), &Value::Int(3));
        assert!(first.class().same_class(second.class()));
    }

    #[test]
    fn model_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Model>();
        assert_send::<ModelClass>();
    }
}
