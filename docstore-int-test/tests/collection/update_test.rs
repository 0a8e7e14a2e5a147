use docstore::collection::{update_many, FindOptions, UpdateOptions};
use docstore::errors::ErrorKind;
use docstore::doc;
use docstore_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};
use serde::Serialize;

#[test]
fn test_update_first_match() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let modified = client.update(
                &doc! { "breed": "Labrador Retriever Mix" },
                &doc! { "outcome_type": "Adoption" },
                &UpdateOptions::default(),
            );
            assert_eq!(modified, 1);

            let adopted = client.read(Some(doc! { "outcome_type": "Adoption" }), &FindOptions::new());
            assert_eq!(adopted.len(), 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_many() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let modified = client.update(
                &doc! { "animal_type": "Dog" },
                &doc! { "outcome_type": "Transfer" },
                &update_many(),
            );
            assert_eq!(modified, 3);

            let transferred = client.read(Some(doc! { "outcome_type": "Transfer" }), &FindOptions::new());
            assert_eq!(transferred.len(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_same_value_modifies_nothing() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let filter = doc! { "name": "Bella" };
            let fields = doc! { "outcome_type": "Adoption" };
            assert_eq!(client.update(&filter, &fields, &update_many()), 1);
            assert_eq!(client.update(&filter, &fields, &update_many()), 0);

            let result = client.try_update(&filter, &fields, &update_many())?;
            assert_eq!(result.matched_count(), 1);
            assert_eq!(result.modified_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_keeps_other_fields() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            client.update(
                &doc! { "name": "Rex" },
                &doc! { "age_upon_outcome_in_weeks": 53, "location.lat": 31.0 },
                &UpdateOptions::default(),
            );

            let rex = client.read(Some(doc! { "name": "Rex" }), &FindOptions::new());
            assert_eq!(rex[0].get_i32("age_upon_outcome_in_weeks").unwrap(), 53);
            assert_eq!(rex[0].get_str("breed").unwrap(), "Labrador Retriever Mix");
            let location = rex[0].get_document("location").unwrap();
            assert_eq!(location, &doc! { "lat": 31.0, "long": -97.48 });
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_with_struct() {
    #[derive(Serialize)]
    struct Outcome {
        outcome_type: String,
        outcome_subtype: String,
    }

    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let outcome = Outcome {
                outcome_type: "Transfer".to_string(),
                outcome_subtype: "Partner".to_string(),
            };
            assert_eq!(client.update(&doc! { "name": "Max" }, &outcome, &update_many()), 1);

            let max = client.read(Some(doc! { "outcome_subtype": "Partner" }), &FindOptions::new());
            assert_eq!(max[0].get_str("name").unwrap(), "Max");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_no_match_never_inserts() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let modified = client.update(
                &doc! { "name": "Ghost" },
                &doc! { "outcome_type": "Adoption" },
                &update_many(),
            );
            assert_eq!(modified, 0);
            assert_eq!(client.read(None, &FindOptions::new()).len(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_empty_filter() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            assert_eq!(client.update(&doc! {}, &doc! { "outcome_type": "Adoption" }, &update_many()), 0);
            assert!(client
                .read(Some(doc! { "outcome_type": "Adoption" }), &FindOptions::new())
                .is_empty());

            let err = client
                .try_update(&doc! {}, &doc! { "outcome_type": "Adoption" }, &update_many())
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_invalid_fields() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;
            let filter = doc! { "name": "Rex" };

            assert_eq!(client.update(&filter, &doc! {}, &update_many()), 0);
            assert_eq!(client.update(&filter, "Adoption", &update_many()), 0);
            assert_eq!(client.update(&filter, &vec![1, 2], &update_many()), 0);
            assert_eq!(
                client.update(&filter, &doc! { "$unset": { "breed": "" } }, &update_many()),
                0
            );

            let rex = client.read(Some(filter), &FindOptions::new());
            assert_eq!(rex[0].get_str("breed").unwrap(), "Labrador Retriever Mix");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
