/// Instruction sent with every image. The labels here are exactly the ones
/// `plantscan_common::parser` looks for; change both together.
pub const PLANT_DESCRIPTION_PROMPT: &str = "\
이 사진 속 식물이나 꽃이 무엇인지 한국어로 설명해주세요.
다른 설명 없이 아래 형식을 그대로 지켜서 답해주세요.

이름: (식물의 일반적인 이름)
학명: (학명)
물주기: (물을 주는 주기)
온도: (적정 온도)
습도: (적정 습도)
특징:
- (특징 1)
- (특징 2)
주의사항:
- (주의사항 1)
- (주의사항 2)";
