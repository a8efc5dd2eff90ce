//! Output layouts prescribed by the report-generation template

use super::ReportType;

const BUSINESS_REPORT: &str = "\
## 업무 보고서

### 1. 개요
- [주요 목적 및 배경]

### 2. 추진 내용
- [주요 활동 1]: [상세 내용]
- [주요 활동 2]: [상세 내용]
- [주요 활동 3]: [상세 내용]

### 3. 주요 성과
- [정량적 성과]: [구체적 수치]
- [정성적 성과]: [핵심 성과]

### 4. 이슈 및 대응 방안
- [이슈 1]: [대응 방안]
- [이슈 2]: [대응 방안]

### 5. 향후 계획
- [단기 계획]
- [중장기 계획]
";

const MEETING_MINUTES: &str = "\
## 회의록 요약

### 📋 회의 정보
- 회의명: [회의 제목]
- 일시: [날짜/시간]
- 참석자: [주요 참석자]

### 💬 주요 논의 사항
1. [논의 주제 1]
   - 핵심 내용: [요약]
   - 결정 사항: [결론]

2. [논의 주제 2]
   - 핵심 내용: [요약]
   - 결정 사항: [결론]

### ✅ 액션 아이템
- [ ] [담당자]: [업무 내용] (마감: [날짜])
- [ ] [담당자]: [업무 내용] (마감: [날짜])

### 📌 차기 회의 안건
- [다음 회의에서 다룰 주제]
";

const PROJECT_STATUS: &str = "\
## 프로젝트 현황 보고서

### 📊 프로젝트 개요
- 프로젝트명: [이름]
- 기간: [시작일 ~ 종료일]
- 진행률: [X%]

### 🎯 주요 마일스톤
| 마일스톤 | 계획일 | 완료일 | 상태 |
|---------|--------|--------|------|
| [항목1] | [날짜] | [날짜] | ✅/🔄/⏸️ |
| [항목2] | [날짜] | [날짜] | ✅/🔄/⏸️ |

### 💡 주요 성과
- [성과 1]: [상세 설명]
- [성과 2]: [상세 설명]

### ⚠️ 리스크 및 이슈
- [리스크 1]: [대응 방안]
- [리스크 2]: [대응 방안]

### 📅 향후 일정
- [주요 일정 1]
- [주요 일정 2]
";

const DATA_ANALYSIS: &str = "\
## 데이터 분석 보고서

### 📈 분석 개요
- 분석 목적: [목적]
- 분석 기간: [기간]
- 데이터 소스: [출처]

### 🔍 주요 발견 사항
1. **[인사이트 1]**
   - 데이터: [구체적 수치]
   - 해석: [의미]

2. **[인사이트 2]**
   - 데이터: [구체적 수치]
   - 해석: [의미]

### 💡 비즈니스 시사점
- [시사점 1]: [상세 설명]
- [시사점 2]: [상세 설명]

### 📋 권장 사항
1. [권장 액션 1]
2. [권장 액션 2]
3. [권장 액션 3]

### 📊 추가 분석 필요 영역
- [향후 분석 주제]
";

/// Layout for a report type; custom types use the business layout
pub fn layout_for(report_type: &ReportType) -> &'static str {
    match report_type {
        ReportType::BusinessReport | ReportType::Custom(_) => BUSINESS_REPORT,
        ReportType::MeetingMinutes => MEETING_MINUTES,
        ReportType::ProjectStatus => PROJECT_STATUS,
        ReportType::DataAnalysis => DATA_ANALYSIS,
    }
}
