mod common;

use std::rc::Rc;
use std::sync::Arc;

use docarray::{to_update_document, Document, DocumentArray, UpdateOp};
use serde_json::{json, Value};

use common::{post_owner, post_schema};

const A: &str = "5f00000000000000000000aa";
const B: &str = "5f00000000000000000000bb";

#[test]
fn positional_sets_translate_to_dotted_set() {
    let owner = post_owner();
    let mut tags = DocumentArray::new(
        vec![json!({"name": "a"}), json!({"name": "b"})],
        "tags",
        &owner,
    )
    .unwrap();
    tags.set_at(1, json!({"name": "x"})).unwrap();
    tags.set_at(0, json!({"name": "y"})).unwrap();

    assert_eq!(
        to_update_document(&tags.update_ops()),
        json!({"$set": {"tags.1": {"name": "x"}, "tags.0": {"name": "y"}}})
    );
}

#[test]
fn structural_ops_translate_per_operator() {
    let owner = post_owner();

    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    scores.push_many([json!(2), json!(3)]).unwrap();
    assert_eq!(
        scores.update_ops(),
        vec![UpdateOp {
            operator: "$push",
            path: "scores".into(),
            value: json!({"$each": [2, 3]}),
        }]
    );

    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    scores.add_to_set([json!(5)]).unwrap();
    assert_eq!(
        to_update_document(&scores.update_ops()),
        json!({"$addToSet": {"scores": {"$each": [5]}}})
    );

    let mut scores = DocumentArray::new(vec![json!(1), json!(2)], "scores", &owner).unwrap();
    scores.pull(|d| d.value() == &json!(2));
    assert_eq!(
        to_update_document(&scores.update_ops()),
        json!({"$pullAll": {"scores": [2]}})
    );

    let mut scores = DocumentArray::new(vec![json!(1), json!(2)], "scores", &owner).unwrap();
    scores.shift_atomic();
    assert_eq!(
        to_update_document(&scores.update_ops()),
        json!({"$pop": {"scores": -1}})
    );
}

#[test]
fn pull_by_id_translates_to_an_in_filter() {
    let owner = post_owner();
    let mut comments = DocumentArray::new(
        vec![json!({"_id": A, "body": "a"}), json!({"_id": B, "body": "b"})],
        "comments",
        &owner,
    )
    .unwrap();
    comments.pull_id(&json!(A));

    assert_eq!(
        to_update_document(&comments.update_ops()),
        json!({"$pull": {"comments": {"_id": {"$in": [A]}}}})
    );
}

#[test]
fn whole_set_sends_the_current_contents() {
    let owner = post_owner();
    let mut scores = DocumentArray::new(vec![json!(3), json!(1)], "scores", &owner).unwrap();
    scores.pop();
    scores.push(json!(7)).unwrap();

    assert_eq!(
        to_update_document(&scores.update_ops()),
        json!({"$set": {"scores": [3, 7]}})
    );
}

#[test]
fn successful_save_clears_the_atomics() {
    let owner = post_owner();
    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    scores.push(json!(2)).unwrap();

    let mut sent: Vec<Value> = Vec::new();
    scores
        .save_with(|ops| -> Result<(), String> {
            sent.push(to_update_document(ops));
            Ok(())
        })
        .unwrap();

    assert_eq!(sent, vec![json!({"$push": {"scores": {"$each": [2]}}})]);
    assert!(scores.atomics().is_empty());
    assert!(!scores.atomic_log().has_backup());
}

#[test]
fn failed_save_restores_the_atomics_for_a_retry() {
    let owner = post_owner();
    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    scores.push(json!(2)).unwrap();
    let pending = scores.atomics().clone();

    let err = scores
        .save_with(|_| Err::<(), _>("connection reset"))
        .unwrap_err();

    assert_eq!(err, "connection reset");
    assert_eq!(scores.atomics(), &pending);
    assert!(!scores.atomic_log().has_backup());

    let mut attempts = 0;
    scores
        .save_with(|ops| -> Result<(), ()> {
            attempts += 1;
            assert_eq!(ops.len(), 1);
            Ok(())
        })
        .unwrap();
    assert_eq!(attempts, 1);
}

#[test]
fn nothing_pending_skips_persist() {
    let owner = post_owner();
    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    let mut called = false;
    scores
        .save_with(|_| -> Result<(), ()> {
            called = true;
            Ok(())
        })
        .unwrap();
    assert!(!called);
}

#[test]
fn modifications_propagate_through_embedded_documents() {
    let root_schema = docarray_schema::DocSchema::builder()
        .field("posts", docarray_schema::SchemaType::documents(post_schema()))
        .build();
    let root = Document::new(Arc::new(root_schema));
    let post = Document::embedded(Arc::new(post_schema()), &root, "posts.0");

    let mut tags = DocumentArray::new(vec![json!({"name": "a"})], "tags", &post).unwrap();
    tags.set_at(0, json!({"name": "b"})).unwrap();

    assert!(post.is_modified("tags.0"));
    assert!(root.is_modified("posts.0.tags.0"));
    assert!(root.is_modified("posts"));
    assert!(!root.is_modified("posts.1"));

    tags.push(json!({"name": "c"})).unwrap();
    assert_eq!(post.modified_paths(), vec!["tags"]);
    assert_eq!(root.modified_paths(), vec!["posts.0.tags"]);
}

#[test]
fn a_dropped_owner_stops_receiving_notifications() {
    let owner = post_owner();
    let mut scores = DocumentArray::new(vec![json!(1)], "scores", &owner).unwrap();
    let weak = Rc::downgrade(&owner);
    drop(owner);

    assert!(weak.upgrade().is_none());
    assert!(scores.owner().is_none());
    assert!(scores.is_bound());

    scores.push(json!("2")).unwrap();
    assert_eq!(scores.to_value(), json!([1, 2]));
    assert_eq!(scores.atomics().len(), 1);
}

#[test]
fn field_changes_inside_an_element_reach_the_root() {
    let root_schema = docarray_schema::DocSchema::builder()
        .field("posts", docarray_schema::SchemaType::documents(post_schema()))
        .build();
    let root = Document::new(Arc::new(root_schema));
    let post = Document::embedded(Arc::new(post_schema()), &root, "posts.2");

    let comments = DocumentArray::new(
        vec![
            json!({"_id": A, "body": "a", "votes": 1}),
            json!({"_id": B, "body": "b", "votes": 2}),
        ],
        "comments",
        &post,
    )
    .unwrap();
    assert_eq!(comments[1].field_path("votes").as_deref(), Some("comments.1.votes"));
    assert_eq!(comments[1].get_path("votes"), Some(&json!(2)));

    comments.mark_field_modified(1, "votes").unwrap();

    assert_eq!(post.modified_paths(), vec!["comments.1.votes"]);
    assert_eq!(root.modified_paths(), vec!["posts.2.comments.1.votes"]);
    assert!(root.is_modified("posts.2.comments.1"));
    assert!(!root.is_modified("posts.2.comments.0"));
    assert!(comments.atomics().is_empty());

    assert!(matches!(
        comments.mark_field_modified(2, "votes"),
        Err(docarray::DocArrayError::OutOfRange { index: 2, len: 2 })
    ));
    assert_eq!(post.modified_paths().len(), 1);
}
