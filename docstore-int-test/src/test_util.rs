use docstore::collection::{full_scope, DocumentStoreClient};
use docstore::errors::StoreResult;
use docstore::{doc, Document};
use fake::faker::name::en::FirstName;
use fake::Fake;
use rand::Rng;
use serde::Serialize;
use std::backtrace::Backtrace;
use std::thread;
use std::time::{Duration, Instant};

pub const TEST_DATABASE: &str = "docstore_test";

/// Runs a test with retry logic and error handling.
///
/// `before` builds a fresh context for every attempt and `after` always
/// runs, even when the test itself failed.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> StoreResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> StoreResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> StoreResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => match after(ctx) {
                        Ok(_) => Ok(()),
                        Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                    },
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_error = Some(e.clone());
                last_backtrace = Some(bt);
                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Error: {}", e);
                    eprintln!("Retrying in {}ms...\n", 100 * attempt);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                last_error = Some(format!("Panic: {}", err_msg));
                last_backtrace = Some(Backtrace::capture().to_string());

                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Panicked (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Panic: {}", err_msg);
                    eprintln!("Retrying in {}ms...\n", 100 * attempt);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
            }
        }
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    collection_name: String,
    client: DocumentStoreClient,
}

impl TestContext {
    pub fn new(collection_name: String, client: DocumentStoreClient) -> Self {
        Self {
            collection_name,
            client,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn client(&self) -> DocumentStoreClient {
        self.client.clone()
    }
}

/// A collection name no other test uses.
pub fn random_collection_name() -> String {
    format!("animals_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(not(feature = "mongo"))]
pub fn create_test_context() -> StoreResult<TestContext> {
    use docstore::store::InMemoryBackend;

    let name = random_collection_name();
    let client = DocumentStoreClient::builder()
        .database(TEST_DATABASE)
        .collection(&name)
        .open_with_backend(InMemoryBackend::new())?;
    Ok(TestContext::new(name, client))
}

/// Connects to `DOCSTORE_TEST_URI` when set, otherwise to the server named
/// by the `MONGO_*` variables.
#[cfg(feature = "mongo")]
pub fn create_test_context() -> StoreResult<TestContext> {
    use docstore::client_builder::ClientBuilder;
    use docstore::client_config::ClientConfig;

    let name = random_collection_name();
    let builder = match std::env::var("DOCSTORE_TEST_URI") {
        Ok(uri) => ClientBuilder::new().uri(&uri),
        Err(_) => ClientBuilder::from_config(ClientConfig::from_env()?),
    };
    let client = builder.database(TEST_DATABASE).collection(&name).open()?;
    Ok(TestContext::new(name, client))
}

/// Empties the test collection and releases the connection.
pub fn cleanup(ctx: TestContext) -> StoreResult<()> {
    let client = ctx.client();
    if !client.is_closed() {
        client.try_delete(&doc! {}, &full_scope())?;
        client.close()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct Animal {
    pub name: String,
    pub animal_type: String,
    pub breed: String,
    pub age_upon_outcome_in_weeks: i32,
    pub outcome_type: Option<String>,
}

const BREEDS: [&str; 4] = ["Labrador Retriever Mix", "German Shepherd", "Beagle", "Siamese"];

pub fn generate_animal() -> Animal {
    let mut rng = rand::rng();
    let breed = BREEDS[rng.random_range(0..BREEDS.len())];
    Animal {
        name: FirstName().fake::<String>(),
        animal_type: (if breed == "Siamese" { "Cat" } else { "Dog" }).to_string(),
        breed: breed.to_string(),
        age_upon_outcome_in_weeks: rng.random_range(1..600),
        outcome_type: None,
    }
}

pub fn generate_animals(count: usize) -> Vec<Animal> {
    (0..count).map(|_| generate_animal()).collect()
}

pub fn create_test_docs() -> Vec<Document> {
    let doc1 = doc! {
        "name": "Rex",
        "animal_type": "Dog",
        "breed": "Labrador Retriever Mix",
        "age_upon_outcome_in_weeks": 52,
        "location": { "lat": 30.75, "long": -97.48 },
        "tags": ["friendly", "large"],
    };

    let doc2 = doc! {
        "name": "Bella",
        "animal_type": "Dog",
        "breed": "Beagle",
        "age_upon_outcome_in_weeks": 130,
        "location": { "lat": 30.61, "long": -97.41 },
        "tags": ["quiet"],
    };

    let doc3 = doc! {
        "name": "Max",
        "animal_type": "Dog",
        "breed": "Labrador Retriever Mix",
        "age_upon_outcome_in_weeks": 21,
        "location": { "lat": 30.51, "long": -97.52 },
        "tags": ["friendly"],
    };

    vec![doc1, doc2, doc3]
}

pub fn insert_test_documents(client: &DocumentStoreClient) -> StoreResult<()> {
    for document in create_test_docs() {
        client.try_create(&document)?;
    }
    Ok(())
}

pub fn is_sorted<T: PartialOrd>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else if prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}

/// Drops `_id` so a stored document can be compared with what was created.
pub fn without_id(document: &Document) -> Document {
    let mut document = document.clone();
    document.remove("_id");
    document
}
