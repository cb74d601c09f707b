//! Fixture domain types with registered schemas.

use chrono::{NaiveDate, NaiveDateTime};
use kindstore_core::{
    ConverterRegistry, Datastore, DomainValue, Field, LongText, Persistable, Relation, Repository,
    RepositoryConfig, Schema, TEXT_TO_FLOAT,
};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// Returns a converter registry with the built-in converters.
#[must_use]
pub fn converter_registry() -> Arc<ConverterRegistry> {
    Arc::new(ConverterRegistry::with_builtins())
}

/// Builds a repository tuned for tests: default chunk size, no
/// inter-chunk pause.
#[must_use]
pub fn test_repository<T: Persistable>(store: Arc<dyn Datastore>) -> Repository<T> {
    Repository::with_config(
        store,
        converter_registry(),
        RepositoryConfig::new().chunk_pause(Duration::ZERO),
    )
}

/// A minimal related type: something a [`Person`] points at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    /// Identity, assigned on first save.
    pub id: Option<i64>,
    /// Country name.
    pub name: String,
    /// ISO code.
    pub code: String,
}

static COUNTRY_SCHEMA: LazyLock<Schema<Country>> = LazyLock::new(|| {
    Schema::builder("Country")
        .field(Field::scalar(
            "name",
            |c: &Country| c.name.clone().into(),
            |c, v| {
                c.name = v.into_text()?;
                Ok(())
            },
        ))
        .field(Field::scalar(
            "code",
            |c: &Country| c.code.clone().into(),
            |c, v| {
                c.code = v.into_text()?;
                Ok(())
            },
        ))
        .build()
});

impl Persistable for Country {
    fn schema() -> &'static Schema<Self> {
        &COUNTRY_SCHEMA
    }
    fn id(&self) -> Option<i64> {
        self.id
    }
    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

/// The kitchen-sink fixture: storage-name override, long text, a date,
/// a converter field, and one eager plus one lazy relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    /// Identity, assigned on first save.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Stored under `email_address`.
    pub email: String,
    /// Large text, stored unindexed.
    pub bio: Option<LongText>,
    /// Date of birth; round-trips without a time-of-day component.
    pub born: Option<NaiveDate>,
    /// Numeric text, stored as a float through a converter.
    pub rating: Option<String>,
    /// Eagerly resolved on read.
    pub country: Relation<Country>,
    /// Lazily resolved on first access.
    pub birthplace: Relation<Country>,
}

static PERSON_SCHEMA: LazyLock<Schema<Person>> = LazyLock::new(|| {
    Schema::builder("Person")
        .field(Field::scalar(
            "name",
            |p: &Person| p.name.clone().into(),
            |p, v| {
                p.name = v.into_text()?;
                Ok(())
            },
        ))
        .field(
            Field::scalar(
                "email",
                |p: &Person| p.email.clone().into(),
                |p, v| {
                    p.email = v.into_text()?;
                    Ok(())
                },
            )
            .storage_name("email_address"),
        )
        .field(Field::scalar(
            "bio",
            |p: &Person| p.bio.clone().into(),
            |p, v| {
                p.bio = v.opt().map(DomainValue::into_long_text).transpose()?;
                Ok(())
            },
        ))
        .field(Field::scalar(
            "born",
            |p: &Person| p.born.into(),
            |p, v| {
                p.born = v.opt().map(DomainValue::into_date).transpose()?;
                Ok(())
            },
        ))
        .field(
            Field::scalar(
                "rating",
                |p: &Person| p.rating.clone().into(),
                |p, v| {
                    p.rating = v.opt().map(DomainValue::into_text).transpose()?;
                    Ok(())
                },
            )
            .converter(TEXT_TO_FLOAT),
        )
        .field(Field::relation::<Country>(
            "country",
            |p: &Person| p.country.key(),
            |p, cell| p.country = cell,
        ))
        .field(
            Field::relation::<Country>(
                "birthplace",
                |p: &Person| p.birthplace.key(),
                |p, cell| p.birthplace = cell,
            )
            .lazy(),
        )
        .build()
});

impl Persistable for Person {
    fn schema() -> &'static Schema<Self> {
        &PERSON_SCHEMA
    }
    fn id(&self) -> Option<i64> {
        self.id
    }
    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

/// A relation-free fixture for round-trip and batch tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    /// Identity, assigned on first save.
    pub id: Option<i64>,
    /// Task title.
    pub title: String,
    /// Completion flag.
    pub done: bool,
    /// Sort rank.
    pub priority: i64,
    /// Optional deadline.
    pub due: Option<NaiveDateTime>,
    /// Free-form notes, deliberately kept out of the indexes.
    pub notes: Option<String>,
}

static TASK_SCHEMA: LazyLock<Schema<Task>> = LazyLock::new(|| {
    Schema::builder("Task")
        .field(Field::scalar(
            "title",
            |t: &Task| t.title.clone().into(),
            |t, v| {
                t.title = v.into_text()?;
                Ok(())
            },
        ))
        .field(Field::scalar(
            "done",
            |t: &Task| t.done.into(),
            |t, v| {
                t.done = v.into_bool()?;
                Ok(())
            },
        ))
        .field(Field::scalar(
            "priority",
            |t: &Task| t.priority.into(),
            |t, v| {
                t.priority = v.into_i64()?;
                Ok(())
            },
        ))
        .field(Field::scalar(
            "due",
            |t: &Task| t.due.into(),
            |t, v| {
                t.due = v.opt().map(DomainValue::into_datetime).transpose()?;
                Ok(())
            },
        ))
        .field(
            Field::scalar(
                "notes",
                |t: &Task| t.notes.clone().into(),
                |t, v| {
                    t.notes = v.opt().map(DomainValue::into_text).transpose()?;
                    Ok(())
                },
            )
            .unindexed(),
        )
        .build()
});

impl Persistable for Task {
    fn schema() -> &'static Schema<Self> {
        &TASK_SCHEMA
    }
    fn id(&self) -> Option<i64> {
        self.id
    }
    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
