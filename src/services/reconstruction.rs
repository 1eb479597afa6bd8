use crate::models::AnalysisResult;

/// Analysis types with dedicated canned findings.
pub const ANALYSIS_TYPES: &[&str] = &[
    "blood_pattern",
    "fingerprint",
    "bullet_trajectory",
    "digital_footprint",
];

fn result(title: &str, findings: &[&str], confidence: u8, recommendations: &[&str]) -> AnalysisResult {
    AnalysisResult {
        title: title.to_string(),
        findings: findings.iter().map(|s| s.to_string()).collect(),
        confidence,
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
    }
}

/// Returns the mock analysis for `analysis_type`. Unknown types get the
/// general analysis.
pub fn analyze(analysis_type: &str) -> AnalysisResult {
    match analysis_type {
        "blood_pattern" => result(
            "Blood Pattern Analysis",
            &[
                "Impact spatter detected",
                "Directionality: NW to SE",
                "Estimated velocity: Medium velocity impact",
            ],
            87,
            &[
                "Check for weapon matching impact pattern",
                "Reconstruct victim position",
            ],
        ),
        "fingerprint" => result(
            "Fingerprint Analysis",
            &[
                "6 points of comparison identified",
                "Match found in criminal database",
                "Right index finger",
            ],
            94,
            &[
                "Suspect: John Doe (ID: CR-78432)",
                "Cross-reference with alibis",
            ],
        ),
        "bullet_trajectory" => result(
            "Bullet Trajectory Reconstruction",
            &[
                "Entry point: 5.2ft from ground",
                "Trajectory angle: 12 degrees downward",
                "Estimated shooter position: 15ft from victim",
            ],
            79,
            &[
                "Check for ballistic evidence at estimated position",
                "Review witness statements for shooter description",
            ],
        ),
        "digital_footprint" => result(
            "Digital Footprint Analysis",
            &[
                "Encrypted communication detected",
                "VPN usage identified",
                "Data exfiltration pattern recognized",
            ],
            91,
            &[
                "Request ISP records",
                "Check for malware on victim systems",
            ],
        ),
        _ => result(
            "General Analysis",
            &[
                "Multiple evidence points analyzed",
                "Pattern recognition complete",
            ],
            75,
            &[
                "Continue evidence collection",
                "Review preliminary findings",
            ],
        ),
    }
}

/// `"bullet_trajectory"` → `"Bullet Trajectory"`.
pub fn display_name(analysis_type: &str) -> String {
    analysis_type
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
