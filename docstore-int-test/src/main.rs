use docstore::collection::{update_many, FindOptions};
use docstore::doc;
use docstore::errors::StoreResult;
use docstore_int_test::test_util::{cleanup, create_test_context, generate_animals};

fn main() -> StoreResult<()> {
    println!("Starting stress test...");
    let ctx = create_test_context()?;
    let client = ctx.client();

    let count = 100_000;
    let animals = generate_animals(count);

    let start = std::time::Instant::now();
    for animal in &animals {
        client.try_create(animal)?;
    }
    println!("Inserted {} animals in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let dogs = client.try_read(Some(doc! { "animal_type": "Dog" }), &FindOptions::new())?;
    println!("Read {} dogs in {:?}", dogs.len(), start.elapsed());

    let start = std::time::Instant::now();
    let result = client.try_update(
        &doc! { "animal_type": "Dog" },
        &doc! { "outcome_type": "Transfer" },
        &update_many(),
    )?;
    println!(
        "Updated {} dogs in {:?}",
        result.modified_count(),
        start.elapsed()
    );

    let start = std::time::Instant::now();
    let transferred = client.try_read(Some(doc! { "outcome_type": "Transfer" }), &FindOptions::new())?;
    println!(
        "Counted {} transferred animals in {:?}",
        transferred.len(),
        start.elapsed()
    );

    cleanup(ctx)
}
