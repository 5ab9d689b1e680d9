use std::sync::{Arc, Mutex};

use modelkit_core::{
    model_object, register_dynamic_class, registered_classes, Archive, ChangeLog, ChangeOutcome,
    ModelError, ModelObject, Observed, Property, PropertyChangeObserver, PropertyValue, Value,
    ValueKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("modelkit_core=trace")
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Default)]
struct Author {
    name: String,
    email: Option<String>,
}

model_object!(Author, "Author", {
    name: String,
    email: Option<String>,
});

/// Hand-written table: `author` is a nested model object.
#[derive(Debug, Clone, Default)]
struct Post {
    title: String,
    words: u32,
    author: Author,
}

static POST_PROPERTIES: [Property<Post>; 3] = [
    Property::new(
        "title",
        ValueKind::Text,
        false,
        |m: &Post| m.title.clone().into_value(),
        |m: &mut Post, v| {
            m.title = String::from_value("title", v)?;
            Ok(())
        },
    ),
    Property::new(
        "words",
        ValueKind::Int,
        false,
        |m: &Post| m.words.into_value(),
        |m: &mut Post, v| {
            m.words = u32::from_value("words", v)?;
            Ok(())
        },
    ),
    Property::new(
        "author",
        ValueKind::Model,
        false,
        |m: &Post| Value::from_model(&m.author),
        |m: &mut Post, v| {
            m.author = v.into_model("author")?;
            Ok(())
        },
    ),
];

impl ModelObject for Post {
    const CLASS_NAME: &'static str = "Post";

    fn properties() -> &'static [Property<Self>] {
        &POST_PROPERTIES
    }
}

impl PropertyChangeObserver for Post {}

fn post() -> Post {
    Post {
        title: "Notes on archiving".to_string(),
        words: 1200,
        author: Author {
            name: "Robin".to_string(),
            email: None,
        },
    }
}

#[test]
fn nested_models_round_trip_through_json() {
    init_tracing();
    let original = post();

    let json = original.encode().to_json_pretty().unwrap();
    let decoded = Post::decode(&Archive::from_json(&json).unwrap()).unwrap();

    assert!(decoded.is_equal_to_model_object(Some(&original)));
    assert_eq!(decoded.author.name, "Robin");
}

#[test]
fn copies_do_not_share_nested_models() {
    let original = post();
    let mut copy = original.copy();
    copy.author.name = "Sam".to_string();

    assert_eq!(original.author.name, "Robin");
    assert!(!copy.is_equal_to_model_object(Some(&original)));
}

#[test]
fn nested_changes_are_reported_as_archives() {
    init_tracing();
    let log = Arc::new(Mutex::new(ChangeLog::new()));
    let mut observed = Observed::new(post()).unwrap();
    observed.observe(Arc::clone(&log));

    let replacement = Author {
        name: "Sam".to_string(),
        email: Some("sam@example.com".to_string()),
    };
    observed
        .set("author", Value::from_model(&replacement))
        .unwrap();

    assert!(observed.author.is_equal_to_model_object(Some(&replacement)));
    let log = log.lock().unwrap();
    let record = &log.records()[0];
    assert_eq!(record.name, "author");
    assert_eq!(record.old, Value::from_model(&post().author));
    assert_eq!(record.new.clone().into_model::<Author>("author").unwrap().name, "Sam");
}

#[test]
fn a_nested_archive_of_the_wrong_class_is_rejected() {
    let mut observed = Observed::new(post()).unwrap();
    let wrong = Value::from_model(&post());

    let err = observed.set("author", wrong).unwrap_err();

    assert!(matches!(err, ModelError::MalformedArchive(_)));
    assert_eq!(observed.author.name, "Robin");
}

#[test]
fn each_type_gets_its_own_dynamic_class() {
    let posts = register_dynamic_class(&Post::class()).unwrap();
    let authors = register_dynamic_class(&Author::class()).unwrap();

    assert_eq!(posts.name(), "ModelObject_Post");
    assert_eq!(authors.name(), "ModelObject_Author");
    assert!(!Arc::ptr_eq(&posts, &authors));

    let names = registered_classes();
    assert!(names.contains(&"ModelObject_Post".to_string()));
    assert!(names.contains(&"ModelObject_Author".to_string()));

    let observed = posts.instantiate(post()).unwrap();
    assert!(Arc::ptr_eq(observed.class(), &posts));
    assert!(posts.instantiate(Author::default()).is_err());
}

#[test]
fn decoding_tampered_archives_fails_cleanly() {
    let mut json: serde_json::Value =
        serde_json::to_value(post().encode()).unwrap();
    json["fields"][1]["value"] = serde_json::json!({ "type": "text", "value": "many" });
    let archive: Archive = serde_json::from_value(json).unwrap();

    let err = Post::decode(&archive).unwrap_err();
    assert!(matches!(err, ModelError::MalformedArchive(_)));
}

#[test]
fn vetoed_writes_report_the_outcome() {
    let mut observed = Observed::new(Author::default()).unwrap();
    observed.observe(ChangeLog::vetoing(|_, _, new| new.is_null()));

    assert_eq!(observed.set("email", Value::Null), Ok(ChangeOutcome::Vetoed));
    assert!(observed.set("email", "a@b.c").unwrap().is_committed());
    assert_eq!(observed.email.as_deref(), Some("a@b.c"));
}
