use chrono::{Local, TimeZone};
use lopdf::content::Content;
use lopdf::{Document, Object};
use lopdf_report::{
    BufferSink, DocumentAssembler, Exercise, FileSink, PageGeometry, PlacementKind,
    RepeatedTitle, ReportError, ReportStyle, TrainingProgram,
};

fn assembler() -> DocumentAssembler {
    DocumentAssembler::new(PageGeometry::a4())
        .with_generated_at(Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
}

fn numbered_program(rows: usize) -> TrainingProgram {
    let mut program = TrainingProgram::new("Twelve Week Base");
    program.goal_type = Some("Strength".to_string());
    program.difficulty = Some("Intermediate".to_string());
    program.description = Some("Linear progression on the main lifts.".to_string());
    for i in 0..rows {
        let mut exercise = Exercise::new(format!("Move {i:03}"));
        exercise.sets = Some(4.into());
        exercise.reps = Some("6-8".into());
        program.exercises.push(exercise);
    }
    program
}

/// Text shown by every `Tj` operator, grouped by page
fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(text, _)) => Some(String::from_utf8_lossy(text).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

#[test]
fn program_without_exercises_fits_one_page() {
    let program = TrainingProgram::new("Mobility");
    let rendered = assembler()
        .render(&program.to_blocks(), &mut BufferSink::new())
        .unwrap();

    let layout = &rendered.layout;
    assert_eq!(layout.page_count(), 1);
    assert_eq!(layout.header_count(), 0);
    assert!(layout.placements().any(|p| p.kind == PlacementKind::Title));
    assert!(layout.placements().any(|p| p.kind == PlacementKind::KeyValue));
    assert!(layout.pages[0].has_footer());

    let texts = page_texts(&rendered.output);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].iter().any(|t| t == "Mobility"));
    assert!(texts[0].iter().any(|t| t == "Exercises:"));
    assert!(texts[0].iter().any(|t| t == "0"));
    assert!(!texts[0].iter().any(|t| t == "Movement"));
}

#[test]
fn long_program_keeps_row_order_across_pages() {
    let rows = 100;
    let rendered = assembler()
        .render(&numbered_program(rows).to_blocks(), &mut BufferSink::new())
        .unwrap();

    let layout = &rendered.layout;
    assert!(layout.page_count() >= 2);
    assert_eq!(layout.rows_in_order(0), (0..rows).collect::<Vec<_>>());

    let texts = page_texts(&rendered.output);
    assert_eq!(texts.len(), layout.page_count());

    let movements: Vec<String> = texts
        .iter()
        .flatten()
        .filter(|t| t.starts_with("Move "))
        .cloned()
        .collect();
    let expected: Vec<String> = (0..rows).map(|i| format!("Move {i:03}")).collect();
    assert_eq!(movements, expected);

    let (last, earlier) = texts.split_last().unwrap();
    assert!(last.iter().any(|t| t.starts_with("Generated on ")));
    assert!(
        earlier
            .iter()
            .all(|page| !page.iter().any(|t| t.starts_with("Generated on ")))
    );
}

#[test]
fn footer_uses_configured_date_format() {
    let style = ReportStyle {
        footer_date_format: "%Y/%m/%d".to_string(),
        ..Default::default()
    };
    let rendered = assembler()
        .with_style(style)
        .render(&numbered_program(1).to_blocks(), &mut BufferSink::new())
        .unwrap();

    let texts = page_texts(&rendered.output);
    assert!(texts[0].iter().any(|t| t == "Generated on 2024/03/01"));
}

#[test]
fn repeated_title_marks_continuation_pages() {
    let program = numbered_program(120);
    let rendered = assembler()
        .with_chrome(RepeatedTitle::new(program.title.clone()))
        .render(&program.to_blocks(), &mut BufferSink::new())
        .unwrap();

    let layout = &rendered.layout;
    assert!(layout.page_count() >= 3);
    assert!(
        !layout.pages[0]
            .placements
            .iter()
            .any(|p| p.kind == PlacementKind::Chrome)
    );
    for page in layout.pages.iter().skip(1) {
        assert_eq!(page.placements[0].kind, PlacementKind::Chrome);
        assert_eq!(page.placements[0].top, 0.0);
    }

    let texts = page_texts(&rendered.output);
    for page in texts.iter().skip(1) {
        assert!(page.iter().any(|t| t == "Twelve Week Base (continued)"));
    }
    assert_eq!(layout.rows_in_order(0), (0..120).collect::<Vec<_>>());
}

#[test]
fn file_sink_writes_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("program.pdf");

    let rendered = assembler()
        .render(&numbered_program(40).to_blocks(), &mut FileSink::new(&target))
        .unwrap();

    assert_eq!(rendered.output, target);
    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(page_texts(&bytes).len(), rendered.layout.page_count());

    // Only the final file remains; no temporary parts are left behind
    let entries: Vec<_> = std::fs::read_dir(target.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("program.pdf")]);
}

#[test]
fn failed_render_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("program.pdf");

    let mut program = numbered_program(3);
    program.description = Some("word ".repeat(20_000));

    let result = assembler().render(&program.to_blocks(), &mut FileSink::new(&target));
    assert!(matches!(
        result,
        Err(ReportError::BlockTooLarge {
            kind: "paragraph",
            ..
        })
    ));
    assert!(!target.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn independent_assemblers_render_concurrently() {
    let program = numbered_program(60);
    let blocks = program.to_blocks();
    let expected = assembler()
        .render(&blocks, &mut BufferSink::new())
        .unwrap()
        .output;

    let outputs: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    assembler()
                        .render(&blocks, &mut BufferSink::new())
                        .unwrap()
                        .output
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(outputs.iter().all(|bytes| *bytes == expected));
}
