//! Month Model
//!
//! The property set behind a month-grid calendar. The grid always shows six
//! full weeks starting on the Sunday on or before the first of the month
//! containing `basis`.
//!
//! Layout, rendering and localized names are left to the consumer; this
//! module only derives the visible range, a few per-cell numbers, and the
//! events that fall inside the range.
//!
//! Events come from [`EventSource`]s registered on a model. Sources are
//! polled whenever the visible range moves or `metaTimestamp` is touched;
//! their events are kept in registration order, then source order.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};

use crate::error::{ComputeError, EngineError, Result};
use crate::graph::{DefinitionSet, PropertyDefinition};
use crate::reactive::{ClassRegistry, ComputeContext, Model, ModelClass};
use crate::value::{Value, ValueType};

pub const CLASS_NAME: &str = "MonthModel";

pub const BASIS: &str = "basis";
pub const VISIBLE_START: &str = "visibleStart";
pub const VISIBLE_END: &str = "visibleEnd";
pub const TODAY: &str = "today";
pub const TODAY_MIN: &str = "todayMin";
pub const TODAY_MAX: &str = "todayMax";
pub const EVENTS_PER_CELL: &str = "eventsPerCell";
pub const ROWS_PER_CELL: &str = "rowsPerCell";
pub const META_TIMESTAMP: &str = "metaTimestamp";
pub const EVENT_SOURCES: &str = "eventSources";
pub const VISIBLE_EVENTS_META: &str = "visibleEventsMeta";

/// Six weeks.
pub const VISIBLE_DAYS: i64 = 7 * 6;

/// Midnight of the Sunday on or before the first of `basis`'s month.
pub fn first_visible_day(basis: NaiveDateTime) -> Option<NaiveDateTime> {
    let first = basis.date().with_day(1)?;
    let back = i64::from(first.weekday().num_days_from_sunday());
    first
        .checked_sub_signed(Duration::days(back))?
        .and_hms_opt(0, 0, 0)
}

/// Last millisecond of the visible range starting at `start`.
pub fn last_visible_instant(start: NaiveDateTime) -> Option<NaiveDateTime> {
    start
        .checked_add_signed(Duration::days(VISIBLE_DAYS))?
        .checked_sub_signed(Duration::milliseconds(1))
}

fn start_of_day(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.date().and_hms_opt(0, 0, 0)
}

fn end_of_day(start: NaiveDateTime) -> Option<NaiveDateTime> {
    start
        .checked_add_signed(Duration::days(1))?
        .checked_sub_signed(Duration::milliseconds(1))
}

fn derive_date(
    ctx: &ComputeContext<'_>,
    derive: fn(NaiveDateTime) -> Option<NaiveDateTime>,
) -> std::result::Result<Value, ComputeError> {
    let input = ctx.date(0)?;
    derive(input).map(Value::Date).ok_or_else(|| {
        ComputeError::new(format!("`{}` is out of range for {input}", ctx.property()))
    })
}

fn now() -> Value {
    Value::Date(Local::now().naive_local())
}

/// Placement data for one calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl EventMeta {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
        }
    }

    /// Whether any part of the event lies within `[from, to]`.
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.start <= to && self.end >= from
    }

    pub fn is_multiday(&self) -> bool {
        self.start.date() != self.end.date()
    }
}

/// Something that can list the events of a date range.
pub trait EventSource: Send + Sync {
    fn visible_events(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<EventMeta>;
}

/// The sources registered on one model, in registration order.
#[derive(Clone, Default)]
pub struct EventSources(Vec<Arc<dyn EventSource>>);

impl EventSources {
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EventSource>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EventSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventSources").field(&self.0.len()).finish()
    }
}

fn collect_visible_events(ctx: &ComputeContext<'_>) -> std::result::Result<Value, ComputeError> {
    let from = ctx.date(0)?;
    let to = ctx.date(1)?;
    let sources = match ctx.input(3) {
        Value::Null => return Ok(Value::List(Vec::new())),
        value => value.downcast_ref::<EventSources>().ok_or_else(|| {
            ComputeError::new(format!(
                "`{EVENT_SOURCES}` holds a {}, not event sources",
                value.type_name()
            ))
        })?,
    };

    let events = sources
        .iter()
        .flat_map(|source| source.visible_events(from, to))
        .filter(|event| event.overlaps(from, to))
        .map(Value::opaque)
        .collect();
    Ok(Value::List(events))
}

/// Event lists are equal when they hold equal events in the same order.
fn event_lists_equal(a: &Value, b: &Value) -> bool {
    match (a.as_list(), b.as_list()) {
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(x, y)| {
                    match (x.downcast_ref::<EventMeta>(), y.downcast_ref::<EventMeta>()) {
                        (Some(x), Some(y)) => x == y,
                        _ => x == y,
                    }
                })
        }
        _ => a == b,
    }
}

/// Declarations of the month model.
pub fn month_model() -> DefinitionSet {
    DefinitionSet::new()
        .define(PropertyDefinition::fundamental_with(BASIS, ValueType::Date, now))
        .define(PropertyDefinition::computed(
            VISIBLE_START,
            ValueType::Date,
            [BASIS],
            |ctx| derive_date(ctx, first_visible_day),
        ))
        .define(PropertyDefinition::computed(
            VISIBLE_END,
            ValueType::Date,
            [VISIBLE_START],
            |ctx| derive_date(ctx, last_visible_instant),
        ))
        .define(PropertyDefinition::fundamental_with(TODAY, ValueType::Date, now))
        .define(PropertyDefinition::computed(
            TODAY_MIN,
            ValueType::Date,
            [TODAY],
            |ctx| derive_date(ctx, start_of_day),
        ))
        .define(PropertyDefinition::computed(
            TODAY_MAX,
            ValueType::Date,
            [TODAY_MIN],
            |ctx| derive_date(ctx, end_of_day),
        ))
        .define(PropertyDefinition::fundamental(
            EVENTS_PER_CELL,
            ValueType::Number,
            5,
        ))
        // One extra row per cell holds the date label.
        .define(PropertyDefinition::computed(
            ROWS_PER_CELL,
            ValueType::Number,
            [EVENTS_PER_CELL],
            |ctx| Ok(Value::Int(ctx.int(0)? + 1)),
        ))
        .define(PropertyDefinition::fundamental(
            META_TIMESTAMP,
            ValueType::Number,
            0,
        ))
        .define(PropertyDefinition::fundamental(
            EVENT_SOURCES,
            ValueType::Object,
            Value::Null,
        ))
        .define(
            PropertyDefinition::computed(
                VISIBLE_EVENTS_META,
                ValueType::Sequence,
                [VISIBLE_START, VISIBLE_END, META_TIMESTAMP, EVENT_SOURCES],
                collect_visible_events,
            )
            .with_comparator(event_lists_equal),
        )
}

/// The shared month model class from the global registry.
pub fn month_class() -> Result<ModelClass> {
    ClassRegistry::global().class(CLASS_NAME, month_model)
}

/// Record that the events of some source changed.
///
/// `visibleEventsMeta` polls every source again.
pub fn touch_meta_timestamp(model: &mut Model) -> Result<()> {
    let millis = Local::now().timestamp_millis();
    let current = model.get(META_TIMESTAMP)?.as_int().unwrap_or(0);
    // Two touches within a millisecond must still register.
    let next = match current.checked_add(1) {
        Some(after) => millis.max(after),
        // Saturated: wrap to the clock so the value still changes.
        None => millis,
    };
    model.set(META_TIMESTAMP, next)
}

/// Register another event source and poll all sources.
pub fn add_event_source(model: &mut Model, source: Arc<dyn EventSource>) -> Result<()> {
    let mut sources = model
        .get(EVENT_SOURCES)?
        .downcast_ref::<EventSources>()
        .cloned()
        .unwrap_or_default();
    sources.0.push(source);
    model.set(EVENT_SOURCES, Value::opaque(sources))
}

/// The events overlapping the visible range, in source order.
pub fn visible_events(model: &Model) -> Result<Vec<&EventMeta>> {
    let list = model.get(VISIBLE_EVENTS_META)?.as_list().unwrap_or_default();
    Ok(list
        .iter()
        .filter_map(|value| value.downcast_ref::<EventMeta>())
        .collect())
}

/// Every visible date, first to last.
pub fn visible_days(model: &Model) -> Result<Vec<NaiveDate>> {
    let date_of = |name: &str| -> Result<NaiveDateTime> {
        model.get(name)?.as_date().ok_or_else(|| EngineError::Compute {
            property: name.to_owned(),
            source: ComputeError::new("not a date"),
        })
    };
    let start = date_of(VISIBLE_START)?;
    let end = date_of(VISIBLE_END)?;

    Ok(start
        .date()
        .iter_days()
        .take_while(|day| day.and_hms_opt(0, 0, 0).is_some_and(|at| at < end))
        .collect())
}
