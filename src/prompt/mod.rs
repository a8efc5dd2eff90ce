//! Prompt composition
//!
//! Pure string assembly: a role chosen by report type, fixed answer
//! constraints, the retrieved context and the question. Report generation
//! uses a second template whose instruction replaces the user question and
//! prescribes a per-type output layout.

mod layouts;
mod report_type;

pub use layouts::layout_for;
pub use report_type::{ReportType, GENERIC_ROLE};

use crate::ingest::Chunk;

/// Join retrieved chunk texts into the context block
pub fn format_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the grounded question-answering prompt
pub fn compose(report_type: &ReportType, chunks: &[Chunk], question: &str) -> String {
    format!(
        "# 당신의 역할
당신은 {role}입니다.
주어진 문서를 기반으로 정확하고 구조화된 답변을 제공해야 합니다.

# 제약조건
- 제공된 문서(Context)의 내용만을 기반으로 답변하세요
- 추측이나 외부 지식을 사용하지 마세요
- 답변은 한국어로 작성하세요
- 비즈니스 관점에서 핵심을 간결하게 전달하세요
- 전문적이고 공식적인 어조를 유지하세요

# 문서 내용 (Context)
{context}

# 질문 (Question)
{question}

# 답변 작성 지침
1. 먼저 질문의 핵심을 파악하세요
2. 문서에서 관련 정보를 찾으세요
3. 정보를 논리적으로 구조화하세요
4. 간결하고 명확하게 답변하세요

# 한국어 답변:",
        role = report_type.role(),
        context = format_context(chunks),
        question = question.trim(),
    )
}

/// Build the fixed report-generation instruction for a report type
///
/// The output format is a common frame (title, summary, key points, action
/// items, conclusion) with the per-type layout as the key-points body.
/// `extra_instructions`, when non-blank, is inserted after the constraints.
pub fn report_instruction(report_type: &ReportType, extra_instructions: Option<&str>) -> String {
    let label = report_type.label();
    let extra = extra_instructions
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("\n# 추가 지시사항\n{}\n", s))
        .unwrap_or_default();

    format!(
        "# 명령문
당신은 World Vision의 {label} 작성 전문가입니다.
업로드된 문서를 철저히 분석하여 구조화된 보고서를 작성해주세요.

# 제약조건
- 문서의 내용만을 기반으로 작성하세요
- 비즈니스 임팩트 중심으로 서술하세요
- 데이터나 수치가 있다면 반드시 포함하세요
- 전문적이고 객관적인 어조를 유지하세요
- 불필요한 수식어는 제거하고 간결하게 작성하세요
- 다른 문장이나 설명은 출력하지 마세요
{extra}
# 입력문
업로드된 문서의 전체 내용을 기반으로 {label}를 작성하시오.

# 출력형식
## [제목]
{label} - [문서명 또는 주제]

## 1. 요약
- 핵심 내용 3-5줄 요약

## 2. 주요 내용
아래 {label} 구성에 따라 작성하세요.

{layout}
## 3. 액션 아이템 (해당 시)
- [ ] 조치 사항 1
- [ ] 조치 사항 2

## 4. 결론 및 제언
- 종합 의견 및 다음 단계

---
*생성일시: [자동 기입]*
",
        layout = layout_for(report_type),
    )
}
