//! Renders a long training program that spans several pages

use lopdf_report::{
    DocumentAssembler, Exercise, FieldValue, FileSink, PageGeometry, RepeatedTitle, ReportStyle,
    TrainingProgram,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let movements = [
        "Back Squat",
        "Romanian Deadlift",
        "Bench Press",
        "Pendlay Row",
        "Overhead Press",
        "Weighted Pull-up",
    ];

    let mut program = TrainingProgram::new("12-Week Strength Cycle");
    program.id = Some(FieldValue::from(7));
    program.goal_type = Some("Strength".to_string());
    program.difficulty = Some("Advanced".to_string());
    program.description = Some(
        "Three-phase linear progression. Accumulation weeks build volume, \
         intensification weeks push load, and the final block peaks for a test day."
            .to_string(),
    );

    for week in 1..=12 {
        for (i, movement) in movements.iter().enumerate() {
            let mut exercise = Exercise::new(format!("W{week} {movement}"));
            exercise.intensity = Some(FieldValue::from(format!("{}%", 65 + week * 2).as_str()));
            exercise.sets = Some(FieldValue::from(5 - (week as i64 - 1) / 4));
            exercise.reps = Some(FieldValue::from(8 - (week as i64 - 1) / 3));
            exercise.rpe = Some(FieldValue::from(7.0 + (week as f64) * 0.2));
            if i % 2 == 0 {
                exercise.tempo = Some(FieldValue::from("3-1-1-0"));
                exercise.rest = Some(FieldValue::from("3 min"));
            }
            if week % 4 == 0 {
                exercise.notes = Some(FieldValue::from(
                    "Deload week: keep bar speed high and stop two reps shy of failure",
                ));
            }
            program.exercises.push(exercise);
        }
    }

    let mut assembler = DocumentAssembler::new(PageGeometry::a4())
        .with_style(ReportStyle::default().with_repeated_table_header(true))
        .with_chrome(RepeatedTitle::new(program.title.clone()))
        .with_title(program.title.clone());

    let path = std::path::Path::new("output").join(program.file_name(0));
    let rendered = assembler.render(&program.to_blocks(), &mut FileSink::new(&path))?;

    println!(
        "Program rendered across {} pages: {}",
        rendered.layout.page_count(),
        rendered.output.display()
    );
    Ok(())
}
