//! Shared plan catalog for search tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use madori_core::{parse_filename, NewPlan, Plan};
use uuid::Uuid;

pub const COMPANY: Uuid = Uuid::from_u128(0x0192_0000_0000_7000_8000_0000_0000_0001);

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
}

/// Build a plan from a canonical filename, created `hours` after the base time.
pub fn plan(filename: &str, hours: i64, favorite: bool) -> Plan {
    let mut plan = NewPlan {
        id: Uuid::new_v4(),
        company_id: COMPANY,
        uploaded_by: None,
        metadata: parse_filename(filename).expect("fixture filename must parse"),
        pdf_path: None,
        content_hash: None,
    }
    .into_plan(base_time() + Duration::hours(hours));
    plan.favorite = favorite;
    plan
}

/// Eight plans spanning every filter dimension, in insertion order.
pub fn catalog() -> Vec<Plan> {
    vec![
        plan("28坪_2LDK_平屋_北_45坪.pdf", 0, false),
        plan("32.5坪_3LDK_2階建て_南_50坪_リビング吹き抜け-WIC-ロフト.pdf", 1, true),
        plan("35坪_4LDK_2階建て_南東_60坪_吹き抜け-パントリー.pdf", 2, false),
        plan("30坪_3LDK_平屋_東_70坪_ウッドデッキ-WIC.pdf", 3, false),
        plan("40坪_5LDK_3階建て_西_38坪_屋上-ビルトインガレージ.pdf", 4, true),
        plan("-_3LDK_-_南_-坪_吹き抜け.pdf", 5, false),
        plan("33坪_3LDK_2階建て_南西_55坪_吹抜-書斎.pdf", 6, false),
        plan("45坪_6LDK_2階建て_北西_80坪_二世帯-WIC.pdf", 7, true),
    ]
}
