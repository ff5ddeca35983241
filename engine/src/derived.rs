//! Dependency-tracked derived properties.
//!
//! A derived property is a compute function over some state `S` plus the set of
//! [`StatePath`]s it reads. Values are computed lazily on first read and cached;
//! [`DerivedEngine::notify_changed`] marks every property that depends on a path
//! as dirty, and the next read recomputes exactly once no matter how many of its
//! paths changed in between.
//!
//! Compute functions receive `&S` only. They cannot reach the engine, so a
//! compute can never invalidate its own dependencies.

use std::any::{self, Any};
use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

use scout_types::StatePath;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;
type ComputeFn<S> = Box<dyn Fn(&S) -> Result<Rc<dyn Any>, BoxError>>;

#[derive(Debug, Error)]
pub enum DerivedError {
    #[error("derived property `{0}` is already defined")]
    Duplicate(&'static str),
    #[error("no derived property named `{0}`")]
    Unknown(String),
    #[error("derived property `{name}` does not hold a `{expected}`")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
    },
    #[error("computing derived property `{name}` failed")]
    Compute {
        name: &'static str,
        #[source]
        source: BoxError,
    },
}

struct DerivedProperty<S> {
    name: &'static str,
    deps: Vec<StatePath>,
    compute: ComputeFn<S>,
    cache: RefCell<Option<Rc<dyn Any>>>,
    dirty: Cell<bool>,
    computations: Cell<u64>,
}

impl<S> fmt::Debug for DerivedProperty<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedProperty")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .field("cached", &self.cache.borrow().is_some())
            .field("dirty", &self.dirty.get())
            .field("computations", &self.computations.get())
            .finish_non_exhaustive()
    }
}

/// Registry of derived properties over a state type `S`.
pub struct DerivedEngine<S> {
    properties: Vec<DerivedProperty<S>>,
}

impl<S> Default for DerivedEngine<S> {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
        }
    }
}

impl<S> fmt::Debug for DerivedEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.properties).finish()
    }
}

impl<S> DerivedEngine<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, computed from `state` and invalidated by any of `deps`.
    ///
    /// Duplicate entries in `deps` are dropped; first-seen order is kept.
    pub fn define<T, E, F>(
        &mut self,
        name: &'static str,
        deps: &[StatePath],
        compute: F,
    ) -> Result<(), DerivedError>
    where
        T: 'static,
        E: Into<BoxError>,
        F: Fn(&S) -> Result<T, E> + 'static,
    {
        if self.find(name).is_some() {
            return Err(DerivedError::Duplicate(name));
        }

        let mut ordered = Vec::with_capacity(deps.len());
        for path in deps {
            if !ordered.contains(path) {
                ordered.push(*path);
            }
        }

        self.properties.push(DerivedProperty {
            name,
            deps: ordered,
            compute: Box::new(move |state: &S| {
                compute(state)
                    .map(|value| Rc::new(value) as Rc<dyn Any>)
                    .map_err(Into::into)
            }),
            cache: RefCell::new(None),
            dirty: Cell::new(true),
            computations: Cell::new(0),
        });
        Ok(())
    }

    /// Read `name`, recomputing from `state` if it is dirty.
    ///
    /// A failed compute leaves the property dirty; the next read retries.
    pub fn get<T: 'static>(&self, name: &str, state: &S) -> Result<Rc<T>, DerivedError> {
        let property = self
            .find(name)
            .ok_or_else(|| DerivedError::Unknown(name.to_string()))?;

        if !property.dirty.get()
            && let Some(cached) = property.cache.borrow().as_ref()
        {
            return downcast(property.name, Rc::clone(cached));
        }

        tracing::debug!(property = property.name, "recomputing derived property");
        let value = (property.compute)(state).map_err(|source| DerivedError::Compute {
            name: property.name,
            source,
        })?;
        *property.cache.borrow_mut() = Some(Rc::clone(&value));
        property.dirty.set(false);
        property.computations.set(property.computations.get() + 1);

        downcast(property.name, value)
    }

    /// Mark every property depending on `path` as dirty.
    ///
    /// Returns how many properties went from clean to dirty.
    pub fn notify_changed(&mut self, path: StatePath) -> usize {
        let mut invalidated = 0;
        for property in self.properties.iter().filter(|p| p.deps.contains(&path)) {
            if !property.dirty.replace(true) {
                invalidated += 1;
            }
        }
        if invalidated > 0 {
            tracing::debug!(%path, invalidated, "invalidated derived properties");
        }
        invalidated
    }

    #[must_use]
    pub fn is_dirty(&self, name: &str) -> Option<bool> {
        self.find(name).map(|p| p.dirty.get())
    }

    /// How many times `name` has been computed successfully.
    #[must_use]
    pub fn computations(&self, name: &str) -> Option<u64> {
        self.find(name).map(|p| p.computations.get())
    }

    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&[StatePath]> {
        self.find(name).map(|p| p.deps.as_slice())
    }

    /// Names of the properties that read `path`, in definition order.
    pub fn dependents_of(&self, path: StatePath) -> impl Iterator<Item = &'static str> + '_ {
        self.properties
            .iter()
            .filter(move |p| p.deps.contains(&path))
            .map(|p| p.name)
    }

    fn find(&self, name: &str) -> Option<&DerivedProperty<S>> {
        self.properties.iter().find(|p| p.name == name)
    }
}

fn downcast<T: 'static>(name: &'static str, value: Rc<dyn Any>) -> Result<Rc<T>, DerivedError> {
    value
        .downcast::<T>()
        .map_err(|_| DerivedError::TypeMismatch {
            name,
            expected: any::type_name::<T>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[derive(Debug, Default)]
    struct Fixture {
        uri: String,
        limit: u64,
    }

    #[derive(Debug, Error)]
    #[error("refused")]
    struct Refused;

    fn counted_engine(counter: Rc<Cell<u32>>) -> DerivedEngine<Fixture> {
        let mut engine = DerivedEngine::new();
        engine
            .define(
                "label",
                &[StatePath::ConnectionUri, StatePath::QueryOptionsLimit],
                move |state: &Fixture| {
                    counter.set(counter.get() + 1);
                    let mut label = state.uri.clone();
                    let _ = write!(label, "/{}", state.limit);
                    Ok::<_, Refused>(label)
                },
            )
            .unwrap();
        engine
    }

    #[test]
    fn first_read_computes_lazily() {
        let counter = Rc::new(Cell::new(0));
        let engine = counted_engine(Rc::clone(&counter));
        assert_eq!(counter.get(), 0);
        assert_eq!(engine.is_dirty("label"), Some(true));

        let state = Fixture {
            uri: "a".into(),
            limit: 1,
        };
        assert_eq!(*engine.get::<String>("label", &state).unwrap(), "a/1");
        assert_eq!(counter.get(), 1);
        assert_eq!(engine.is_dirty("label"), Some(false));
    }

    #[test]
    fn clean_reads_hit_the_cache() {
        let counter = Rc::new(Cell::new(0));
        let engine = counted_engine(Rc::clone(&counter));
        let state = Fixture::default();
        for _ in 0..5 {
            engine.get::<String>("label", &state).unwrap();
        }
        assert_eq!(counter.get(), 1);
        assert_eq!(engine.computations("label"), Some(1));
    }

    #[test]
    fn several_changes_cause_one_recompute() {
        let counter = Rc::new(Cell::new(0));
        let mut engine = counted_engine(Rc::clone(&counter));
        let mut state = Fixture::default();
        engine.get::<String>("label", &state).unwrap();

        state.uri = "x".into();
        assert_eq!(engine.notify_changed(StatePath::ConnectionUri), 1);
        state.limit = 9;
        assert_eq!(engine.notify_changed(StatePath::QueryOptionsLimit), 0);
        state.uri = "y".into();
        engine.notify_changed(StatePath::ConnectionUri);

        assert_eq!(*engine.get::<String>("label", &state).unwrap(), "y/9");
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn unrelated_path_does_not_invalidate() {
        let counter = Rc::new(Cell::new(0));
        let mut engine = counted_engine(Rc::clone(&counter));
        let state = Fixture::default();
        engine.get::<String>("label", &state).unwrap();
        assert_eq!(engine.notify_changed(StatePath::StatusbarMessage), 0);
        engine.get::<String>("label", &state).unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn failed_compute_stays_dirty_and_retries() {
        let attempts = Rc::new(Cell::new(0));
        let mut engine: DerivedEngine<Fixture> = DerivedEngine::new();
        let seen = Rc::clone(&attempts);
        engine
            .define("flaky", &[StatePath::ConnectionUri], move |state: &Fixture| {
                seen.set(seen.get() + 1);
                if state.uri.is_empty() {
                    Err(Refused)
                } else {
                    Ok(state.uri.len())
                }
            })
            .unwrap();

        let mut state = Fixture::default();
        let err = engine.get::<usize>("flaky", &state).unwrap_err();
        assert!(matches!(err, DerivedError::Compute { name: "flaky", .. }));
        assert_eq!(engine.is_dirty("flaky"), Some(true));
        assert_eq!(engine.computations("flaky"), Some(0));

        state.uri = "abc".into();
        assert_eq!(*engine.get::<usize>("flaky", &state).unwrap(), 3);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut engine = counted_engine(Rc::new(Cell::new(0)));
        let err = engine
            .define("label", &[], |_: &Fixture| Ok::<_, Refused>(()))
            .unwrap_err();
        assert!(matches!(err, DerivedError::Duplicate("label")));
    }

    #[test]
    fn unknown_and_mistyped_reads_fail() {
        let engine = counted_engine(Rc::new(Cell::new(0)));
        let state = Fixture::default();
        assert!(matches!(
            engine.get::<String>("nope", &state),
            Err(DerivedError::Unknown(_))
        ));
        assert!(matches!(
            engine.get::<u64>("label", &state),
            Err(DerivedError::TypeMismatch { name: "label", .. })
        ));
    }

    #[test]
    fn dependency_lists_are_deduplicated_in_order() {
        let mut engine: DerivedEngine<Fixture> = DerivedEngine::new();
        engine
            .define(
                "p",
                &[
                    StatePath::QueryOptionsSkip,
                    StatePath::ConnectionUri,
                    StatePath::QueryOptionsSkip,
                ],
                |_: &Fixture| Ok::<_, Refused>(0_u8),
            )
            .unwrap();
        assert_eq!(
            engine.dependencies("p"),
            Some(&[StatePath::QueryOptionsSkip, StatePath::ConnectionUri][..])
        );
        assert_eq!(
            engine.dependents_of(StatePath::ConnectionUri).collect::<Vec<_>>(),
            vec!["p"]
        );
    }
}
