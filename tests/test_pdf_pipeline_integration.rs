//! End-to-end tests: generated PDF → chunks → index → prompt → answer

mod common;

use common::{pdf_bytes, services, write_pdf, RecordingGenerator};
use docent::ingest::PdfLoader;
use docent::{DocentError, Pipeline, PipelineConfig, ReportType, Session};
use std::sync::Arc;
use tempfile::TempDir;

fn small_config() -> PipelineConfig {
    PipelineConfig {
        chunk_size: 10,
        chunk_overlap: 2,
        top_k: 1,
        ..Default::default()
    }
}

#[test]
fn test_loader_reads_pages_in_order() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(temp.path(), "two_pages.pdf", &["Alpha Beta Gamma.", "Delta Epsilon."]);

    let document = PdfLoader::load_path(&path).unwrap();
    assert_eq!(document.name, "two_pages.pdf");
    assert_eq!(document.stem(), "two_pages");
    assert_eq!(document.page_count(), 2);
    assert!(document.pages[0].text.contains("Alpha Beta Gamma."));
    assert!(document.pages[1].text.contains("Delta Epsilon."));
}

#[test]
fn test_blank_pdf_is_rejected() {
    // Structurally valid pages, none carrying any text
    let bytes = pdf_bytes(&["", " "]);

    match PdfLoader::load_bytes("blank.pdf", &bytes) {
        Err(DocentError::DocumentParse { source_name, message }) => {
            assert_eq!(source_name, "blank.pdf");
            assert!(message.contains("No text content"));
        }
        other => panic!("expected DocumentParse, got {:?}", other.map(|d| d.page_count())),
    }
}

#[test]
fn test_two_page_pdf_question_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(temp.path(), "sample.pdf", &["Alpha Beta Gamma.", "Delta Epsilon."]);

    let generator = Arc::new(RecordingGenerator::new("감마에 대한 답변입니다."));
    let mut session = Session::new(services(Arc::clone(&generator)));
    session.open_document(&path).unwrap();
    assert!(session.configure(small_config()).unwrap());

    let pipeline = session.pipeline().unwrap();
    let first_page: Vec<&str> = pipeline
        .chunks()
        .iter()
        .filter(|c| c.page == 0)
        .map(|c| c.text.as_str())
        .collect();
    assert!(first_page.len() >= 2);
    assert!(first_page.iter().all(|t| t.chars().count() <= 10));

    let answer = session.ask("Gamma").unwrap();
    assert_eq!(answer.text, "감마에 대한 답변입니다.");
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].text, "Gamma.");
    assert_eq!(answer.sources[0].page, 0);

    let prompt = generator.last_prompt();
    assert!(prompt.contains("Gamma."));
    assert!(prompt.contains("# 질문 (Question)\nGamma"));
    assert_eq!(session.conversation().len(), 2);
}

#[test]
fn test_identical_builds_are_identical() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(
        temp.path(),
        "repeat.pdf",
        &["Quarterly revenue grew. Costs were flat.", "Hiring resumes in May."],
    );
    let document = PdfLoader::load_path(&path).unwrap();
    let services = services(Arc::new(RecordingGenerator::new("ok")));

    let config = PipelineConfig {
        chunk_size: 20,
        chunk_overlap: 5,
        ..Default::default()
    };
    let first = Pipeline::build(&document, config.clone(), &services).unwrap();
    let second = Pipeline::build(&document, config, &services).unwrap();

    assert_eq!(first.chunk_count(), second.chunk_count());
    assert_eq!(first.chunks(), second.chunks());
}

#[test]
fn test_meeting_minutes_report() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(
        temp.path(),
        "weekly_sync.pdf",
        &["Attendees: Kim, Lee. Decision: ship v2 on Friday."],
    );

    let generator = Arc::new(RecordingGenerator::new(
        "## 회의록 요약\n---\n*생성일시: [자동 기입]*",
    ));
    let mut session = Session::new(services(Arc::clone(&generator)));
    session.open_document(&path).unwrap();
    session
        .configure(PipelineConfig {
            report_type: ReportType::MeetingMinutes,
            ..Default::default()
        })
        .unwrap();

    let report = session.generate_report(Some("결정 사항을 강조하세요")).unwrap();

    let prompt = generator.last_prompt();
    assert!(prompt.contains("회의 정보"));
    assert!(prompt.contains("주요 논의 사항"));
    assert!(prompt.contains("액션 아이템"));
    assert!(prompt.contains("결정 사항을 강조하세요"));
    assert!(prompt.contains("Decision: ship v2 on Friday."));

    assert_eq!(report.file_name(), "meeting_minutes_weekly_sync.txt");
    assert!(!report.text.contains("[자동 기입]"));

    let out = temp.path().join("reports");
    let saved = report.save(&out).unwrap();
    assert!(saved.ends_with("meeting_minutes_weekly_sync.txt"));
    assert!(std::fs::read_to_string(saved).unwrap().starts_with("## 회의록 요약"));

    // Reports do not enter the conversation
    assert!(session.conversation().is_empty());
}

#[test]
fn test_truncated_answer_is_flagged() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(temp.path(), "long.pdf", &["Budget review for the third quarter."]);

    let generator = Arc::new(RecordingGenerator::truncating("## 업무 보고서\n### 1."));
    let mut session = Session::new(services(generator));
    session.open_document(&path).unwrap();
    session.configure(PipelineConfig::default()).unwrap();

    let answer = session.ask("Budget?").unwrap();
    assert!(answer.truncated);
    assert_eq!(answer.text, "## 업무 보고서\n### 1.");
}

#[test]
fn test_unknown_report_type_falls_back() {
    let temp = TempDir::new().unwrap();
    let path = write_pdf(temp.path(), "memo.pdf", &["Office move planned for June."]);

    let generator = Arc::new(RecordingGenerator::new("ok"));
    let mut session = Session::new(services(Arc::clone(&generator)));
    session.open_document(&path).unwrap();
    session
        .configure(PipelineConfig {
            report_type: ReportType::from_label("이사 계획"),
            ..Default::default()
        })
        .unwrap();

    session.ask("When is the move?").unwrap();
    assert!(generator
        .last_prompt()
        .contains("당신은 World Vision의 보고서 작성 전문가입니다."));

    let report = session.generate_report(None).unwrap();
    assert_eq!(report.file_name(), "이사_계획_memo.txt");
}

#[test]
fn test_non_pdf_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("notes.pdf");
    std::fs::write(&path, "plain text pretending to be a PDF").unwrap();

    let mut session = Session::new(services(Arc::new(RecordingGenerator::new("ok"))));
    assert!(matches!(
        session.open_document(&path),
        Err(DocentError::DocumentParse { .. })
    ));
    assert!(session.document().is_none());
}
