use std::{path::PathBuf, sync::Arc, thread};

use rotlog::{LoggerConfig, StructuredLogger, fields};

fn main() {
    let dir = PathBuf::from("/tmp/rotlog_example_rotation");
    let _ = std::fs::remove_dir_all(&dir);

    let config = LoggerConfig::new(&dir)
        .with_max_file_size(4_096)
        .with_max_files(3)
        .with_cleanup_on_rotate(true);
    let logger = Arc::new(StructuredLogger::new(config).expect("Unable to create logger"));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let ctx = logger.with(fields! { "worker" => worker });
                for i in 0..100 {
                    ctx.info("Log message", fields! { "n" => i })
                        .expect("Unable to write log record");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    logger.close().expect("Unable to close logger");

    let files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".log"))
        .collect();

    println!("\n--- Rotation Summary ---");
    println!("Log directory: {}", dir.display());
    println!("Files remaining (max_files=3): {}", files.len());
    for f in &files {
        println!("  {f}");
    }
    assert!(files.len() <= 3, "max_files cleanup should keep at most 3");
}
