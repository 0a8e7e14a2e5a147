use docstore::collection::{
    include_fields, limit_to, order_by, project, skip_by, FindOptions, Projection,
};
use docstore::common::{SortOrder, SortableFields};
use docstore::errors::ErrorKind;
use docstore::doc;
use docstore_int_test::test_util::{
    cleanup, create_test_context, generate_animals, insert_test_documents, is_sorted, run_test,
};

fn ages(documents: &[docstore::Document]) -> Vec<i32> {
    documents
        .iter()
        .map(|d| d.get_i32("age_upon_outcome_in_weeks").unwrap())
        .collect()
}

#[test]
fn test_read_all() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            assert_eq!(client.read(None, &FindOptions::new()).len(), 3);
            assert_eq!(client.read(Some(doc! {}), &FindOptions::new()).len(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_empty_collection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            assert!(client.read(None, &FindOptions::new()).is_empty());
            assert!(client.try_read(None, &FindOptions::new())?.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_with_filter() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let labs = client.read(
                Some(doc! { "breed": "Labrador Retriever Mix" }),
                &FindOptions::new(),
            );
            assert_eq!(labs.len(), 2);

            let both = client.read(
                Some(doc! { "breed": "Labrador Retriever Mix", "name": "Max" }),
                &FindOptions::new(),
            );
            assert_eq!(both.len(), 1);

            let nested = client.read(Some(doc! { "location.lat": 30.61 }), &FindOptions::new());
            assert_eq!(nested[0].get_str("name").unwrap(), "Bella");

            let tagged = client.read(Some(doc! { "tags": "friendly" }), &FindOptions::new());
            assert_eq!(tagged.len(), 2);

            let none = client.read(Some(doc! { "breed": "Poodle" }), &FindOptions::new());
            assert!(none.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_sorted() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let ascending = client.read(
                None,
                &order_by("age_upon_outcome_in_weeks", SortOrder::Ascending),
            );
            assert_eq!(ages(&ascending), vec![21, 52, 130]);

            let descending = client.read(
                None,
                &order_by("age_upon_outcome_in_weeks", SortOrder::Descending),
            );
            assert_eq!(ages(&descending), vec![130, 52, 21]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_multi_key_sort() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let sort: SortableFields = vec![
                ("breed", SortOrder::Descending),
                ("age_upon_outcome_in_weeks", SortOrder::Ascending),
            ]
            .into_iter()
            .collect();
            let found = client.read(None, &FindOptions::new().sort(sort));
            let names: Vec<&str> = found.iter().map(|d| d.get_str("name").unwrap()).collect();
            assert_eq!(names, vec!["Max", "Rex", "Bella"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_sorted_generated() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            for animal in generate_animals(50) {
                assert!(client.create(&animal));
            }

            let found = client.read(
                None,
                &order_by("age_upon_outcome_in_weeks", SortOrder::Descending),
            );
            assert_eq!(found.len(), 50);
            assert!(is_sorted(ages(&found), false));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_limit() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            assert_eq!(client.read(None, &limit_to(2)).len(), 2);
            assert_eq!(client.read(None, &limit_to(3)).len(), 3);
            assert_eq!(client.read(None, &limit_to(10)).len(), 3);
            assert_eq!(client.read(None, &limit_to(0)).len(), 3);
            assert_eq!(client.read(None, &limit_to(-1)).len(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_sort_applies_before_limit() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let youngest = client.read(
                None,
                &order_by("age_upon_outcome_in_weeks", SortOrder::Ascending).limit(1),
            );
            assert_eq!(youngest.len(), 1);
            assert_eq!(youngest[0].get_str("name").unwrap(), "Max");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_skip() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let page = client.read(
                None,
                &order_by("age_upon_outcome_in_weeks", SortOrder::Ascending)
                    .skip(1)
                    .limit(1),
            );
            assert_eq!(ages(&page), vec![52]);
            assert!(client.read(None, &skip_by(5)).is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_projection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let found = client.read(
                Some(doc! { "name": "Rex" }),
                &project(include_fields(&["name", "breed"])),
            );
            assert_eq!(found.len(), 1);
            let keys: Vec<&str> = found[0].keys().map(|k| k.as_str()).collect();
            assert_eq!(keys, vec!["_id", "name", "breed"]);

            let found = client.read(
                Some(doc! { "name": "Rex" }),
                &project(Projection::new().include("location.lat").exclude("_id")),
            );
            assert_eq!(found[0], doc! { "location": { "lat": 30.75 } });
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_invalid_projection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let options = project(Projection::new().include("name").exclude("breed"));
            assert!(client.read(None, &options).is_empty());

            let err = client.try_read(None, &options).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_rereads() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let first = client.read(None, &FindOptions::new());
            assert!(client.create(&doc! { "name": "Luna" }));
            let second = client.read(None, &FindOptions::new());

            assert_eq!(first.len(), 3);
            assert_eq!(second.len(), 4);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_with_server_style_mappings() {
    run_test(
        || create_test_context(),
        |ctx| {
            let client = ctx.client();
            insert_test_documents(&client)?;

            let options = FindOptions::new()
                .sort_document(&doc! { "breed": 1, "age_upon_outcome_in_weeks": -1 })?
                .projection_document(&doc! { "name": 1, "_id": 0 })?;
            let found = client.read(None, &options);

            assert_eq!(
                found,
                vec![
                    doc! { "name": "Bella" },
                    doc! { "name": "Rex" },
                    doc! { "name": "Max" },
                ]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
