use docstore::collection::{FindOptions, RemoveOptions, UpdateOptions};
use docstore::doc;
use docstore_int_test::test_util::{cleanup, create_test_context, run_test, without_id};

#[test]
fn test_round_trip() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            let rex = doc! {
                "animal_id": "A746874",
                "name": "Rex",
                "breed": "Labrador Retriever Mix",
                "outcome_type": "Transfer",
            };
            let filter = doc! { "animal_id": "A746874" };

            assert!(client.create(&rex));
            let found = client.read(Some(filter.clone()), &FindOptions::new());
            assert_eq!(found.len(), 1);
            assert_eq!(without_id(&found[0]), rex);

            let modified = client.update(
                &filter,
                &doc! { "outcome_type": "Adoption" },
                &UpdateOptions::default(),
            );
            assert_eq!(modified, 1);
            let found = client.read(Some(filter.clone()), &FindOptions::new());
            assert_eq!(found[0].get_str("outcome_type").unwrap(), "Adoption");
            assert_eq!(found[0].get_str("name").unwrap(), "Rex");

            assert_eq!(client.delete(&filter, &RemoveOptions::default()), 1);
            assert!(client.read(Some(filter), &FindOptions::new()).is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_round_trip_typed() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();

            let id = client
                .try_create(&doc! { "name": "Luna", "animal_type": "Cat" })?
                .inserted_id()
                .cloned()
                .unwrap();
            let filter = doc! { "_id": id };

            assert_eq!(client.try_read(Some(filter.clone()), &FindOptions::new())?.len(), 1);

            let result = client.try_update(&filter, &doc! { "name": "Luna II" }, &UpdateOptions::default())?;
            assert_eq!((result.matched_count(), result.modified_count()), (1, 1));

            let result = client.try_delete(&filter, &RemoveOptions::default())?;
            assert_eq!(result.deleted_count(), 1);
            assert!(client.try_read(Some(filter), &FindOptions::new())?.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
