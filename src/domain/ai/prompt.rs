/// 감정/상황 분석 시스템 프롬프트
///
/// 후보 카테고리를 알려 주되, 모델이 후보 밖의 표현을 내도 정규화 단계에서 보정합니다.
pub fn mood_system_prompt(emotions: &[String], situations: &[String]) -> String {
    format!(
        r#"너는 사용자가 쓴 글에서 감정과 상황을 분석하는 AI야.

다음 규칙을 지켜서 답해줘.
1. 감정은 다음 중 하나로 표현해줘: {emotions}
2. 상황은 다음 중 하나로 표현해줘: {situations}
3. 글에서 드러나지 않으면 "알 수 없음"이라고 써줘.
4. 다른 설명 없이 JSON 한 개만 출력해줘.

출력 형식:
{{"emotion": "감정", "situation": "상황"}}"#,
        emotions = emotions.join(", "),
        situations = situations.join(", "),
    )
}

/// 감정/상황 분석 사용자 프롬프트
pub fn mood_user_prompt(text: &str) -> String {
    format!("다음 글의 감정과 상황을 분석해줘.\n\n{}", text.trim())
}
