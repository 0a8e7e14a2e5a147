use docstore::collection::FindOptions;
use docstore::errors::ErrorKind;
use docstore::{doc, Bson};
use docstore_int_test::test_util::{
    cleanup, create_test_context, create_test_docs, generate_animal, run_test, without_id,
};
use std::collections::HashMap;

#[test]
fn test_create_then_read() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            for document in create_test_docs() {
                assert!(client.create(&document));
            }

            let stored: Vec<_> = client
                .read(None, &FindOptions::new())
                .iter()
                .map(without_id)
                .collect();
            for document in create_test_docs() {
                assert!(stored.contains(&document));
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_struct() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            let animal = generate_animal();
            assert!(client.create(&animal));

            let found = client.read(Some(doc! { "name": animal.name.as_str() }), &FindOptions::new());
            assert!(!found.is_empty());
            assert_eq!(found[0].get_str("breed").unwrap(), animal.breed);
            assert_eq!(
                found[0].get_i32("age_upon_outcome_in_weeks").unwrap(),
                animal.age_upon_outcome_in_weeks
            );
            assert_eq!(found[0].get("outcome_type"), Some(&Bson::Null));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_assigns_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            let result = client.try_create(&doc! { "name": "Rex" })?;
            let id = result.inserted_id().cloned().unwrap();
            assert!(matches!(id, Bson::ObjectId(_)));

            let found = client.read(Some(doc! { "_id": id }), &FindOptions::new());
            assert_eq!(found.len(), 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_keeps_caller_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            let result = client.try_create(&doc! { "_id": "A725717", "name": "Rex" })?;
            assert_eq!(result.inserted_id(), Some(&Bson::String("A725717".to_string())));

            // same id again is refused by the backend
            assert!(!client.create(&doc! { "_id": "A725717", "name": "Max" }));
            assert_eq!(client.read(None, &FindOptions::new()).len(), 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_empty_document() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            assert!(!client.create(&doc! {}));
            assert!(!client.create(&HashMap::<String, i32>::new()));
            assert!(client.read(None, &FindOptions::new()).is_empty());

            let err = client.try_create(&doc! {}).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_non_mapping() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            assert!(!client.create("Rex"));
            assert!(!client.create(&12));
            assert!(!client.create(&vec!["Rex", "Max"]));
            assert!(!client.create(&Option::<String>::None));
            assert!(client.read(None, &FindOptions::new()).is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
