//! Concurrency tests for the classifier registry
//!
//! Each request in the server runs on its own task, so these tests hammer a
//! shared registry from many tokio workers at once.

use bayeshub_classifiers::ClassifierRegistry;
use bayeshub_core::Error;
use std::sync::Arc;

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_has_one_winner() {
    let registry = Arc::new(ClassifierRegistry::default());

    let mut tasks = Vec::new();
    for _ in 0..32 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            registry.create("contested", &labels(&["good", "bad"]))
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::AlreadyExists(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 31);
    assert_eq!(registry.list(), vec!["contested"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_training_on_distinct_names_does_not_interfere() {
    let registry = Arc::new(ClassifierRegistry::default());
    registry.create("mail", &labels(&["good", "spam"])).unwrap();
    registry.create("things", &labels(&["fruit", "computer"])).unwrap();

    let mail_batches: Vec<(Vec<String>, Vec<String>)> = (0..50)
        .map(|i| {
            let class = if i % 2 == 0 { "good" } else { "spam" };
            (labels(&[class]), vec![format!("message number {}", i)])
        })
        .collect();
    let thing_batches: Vec<(Vec<String>, Vec<String>)> = (0..50)
        .map(|i| {
            let class = if i % 3 == 0 { "computer" } else { "fruit" };
            (labels(&[class]), vec![format!("item {} in the basket", i)])
        })
        .collect();

    let mut tasks = Vec::new();
    for (classes, phrases) in mail_batches.iter().cloned() {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            registry.train("mail", &classes, &phrases)
        }));
    }
    for (classes, phrases) in thing_batches.iter().cloned() {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            registry.train("things", &classes, &phrases)
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // The same requests applied one at a time
    let sequential = ClassifierRegistry::default();
    sequential.create("mail", &labels(&["good", "spam"])).unwrap();
    sequential.create("things", &labels(&["fruit", "computer"])).unwrap();
    for (classes, phrases) in &mail_batches {
        sequential.train("mail", classes, phrases).unwrap();
    }
    for (classes, phrases) in &thing_batches {
        sequential.train("things", classes, phrases).unwrap();
    }

    for name in ["mail", "things"] {
        assert_eq!(registry.info(name).unwrap(), sequential.info(name).unwrap());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_predict_while_training_same_name() {
    let registry = Arc::new(ClassifierRegistry::default());
    registry.create("things", &labels(&["fruit", "computer"])).unwrap();
    registry
        .train("things", &labels(&["fruit"]), &labels(&["apple"]))
        .unwrap();
    registry
        .train("things", &labels(&["computer"]), &labels(&["Dell"]))
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..40 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                registry
                    .train("things", &labels(&["fruit"]), &labels(&["grapes apricot"]))
                    .map(|_| ())
            } else {
                registry
                    .predict("things", "grapes")
                    .map(|prediction| assert_eq!(prediction.scores.len(), 2))
            }
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(registry.get("things").unwrap().learned(), 22);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_races_with_lookups() {
    let registry = Arc::new(ClassifierRegistry::default());
    registry.create("short-lived", &labels(&["a", "b"])).unwrap();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            if i == 10 {
                registry.delete("short-lived")
            } else {
                match registry.get("short-lived") {
                    Ok(handle) => {
                        assert_eq!(handle.classes(), ["a", "b"]);
                        Ok(())
                    }
                    Err(Error::NotFound(_)) => Ok(()),
                    Err(e) => Err(e),
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert!(registry.is_empty());
    assert!(matches!(registry.delete("short-lived"), Err(Error::NotFound(_))));
}
