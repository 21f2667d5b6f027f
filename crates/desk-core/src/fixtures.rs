//! Fixture data for the service-order desk.
//!
//! The desk operates against a compiled-in set of demonstration orders; the
//! store is seeded from these records once at startup and there is no other
//! creation path.

use chrono::{DateTime, TimeZone, Utc};
use desk_types::{Order, OrderStatus, Priority};

fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
		.single()
		.expect("fixture timestamps are valid")
}

/// Returns the seed orders, in the order they appear in the dashboard.
pub fn seed_orders() -> Vec<Order> {
	vec![
		Order {
			id: "ORD-001".to_string(),
			customer: "Telkomsel Jakarta".to_string(),
			service: "Metro-E 10 Gbps".to_string(),
			source: "TBS 1".to_string(),
			destination: "BTS Jagakarsa".to_string(),
			status: OrderStatus::PendingApproval,
			bandwidth: "10 Gbps".to_string(),
			priority: Priority::High,
			created: ts(2024, 1, 15, 10, 30),
			updated: ts(2024, 1, 15, 14, 22),
			conflicts: vec!["bandwidth_utilization".to_string()],
			uim_status: "available".to_string(),
			nms_status: "conflict_detected".to_string(),
			utilization: 75,
			estimated_completion: ts(2024, 1, 16, 16, 0),
		},
		Order {
			id: "ORD-002".to_string(),
			customer: "Bank Mandiri Pusat".to_string(),
			service: "Dedicated Internet 5 Gbps".to_string(),
			source: "TBS 2".to_string(),
			destination: "DC Kelapa Gading".to_string(),
			status: OrderStatus::Approved,
			bandwidth: "5 Gbps".to_string(),
			priority: Priority::Medium,
			created: ts(2024, 1, 14, 9, 15),
			updated: ts(2024, 1, 15, 11, 45),
			conflicts: vec![],
			uim_status: "available".to_string(),
			nms_status: "available".to_string(),
			utilization: 45,
			estimated_completion: ts(2024, 1, 16, 14, 0),
		},
		Order {
			id: "ORD-003".to_string(),
			customer: "Universitas Indonesia".to_string(),
			service: "Metro-E 25 Gbps".to_string(),
			source: "TBS 1".to_string(),
			destination: "Campus Depok".to_string(),
			status: OrderStatus::Conflict,
			bandwidth: "25 Gbps".to_string(),
			priority: Priority::High,
			created: ts(2024, 1, 15, 8, 45),
			updated: ts(2024, 1, 15, 15, 10),
			conflicts: vec![
				"capacity_exceeded".to_string(),
				"route_unavailable".to_string(),
			],
			uim_status: "limited".to_string(),
			nms_status: "unavailable".to_string(),
			utilization: 95,
			estimated_completion: ts(2024, 1, 18, 12, 0),
		},
		Order {
			id: "ORD-004".to_string(),
			customer: "PT Astra International".to_string(),
			service: "MPLS 15 Gbps".to_string(),
			source: "TBS 3".to_string(),
			destination: "HQ Sunter".to_string(),
			status: OrderStatus::Processing,
			bandwidth: "15 Gbps".to_string(),
			priority: Priority::High,
			created: ts(2024, 1, 13, 14, 20),
			updated: ts(2024, 1, 15, 16, 30),
			conflicts: vec![],
			uim_status: "available".to_string(),
			nms_status: "provisioning".to_string(),
			utilization: 60,
			estimated_completion: ts(2024, 1, 16, 18, 0),
		},
		Order {
			id: "ORD-005".to_string(),
			customer: "Shopee Indonesia".to_string(),
			service: "Cloud Connect 50 Gbps".to_string(),
			source: "TBS 4".to_string(),
			destination: "AWS Direct Connect".to_string(),
			status: OrderStatus::Completed,
			bandwidth: "50 Gbps".to_string(),
			priority: Priority::Critical,
			created: ts(2024, 1, 12, 11, 0),
			updated: ts(2024, 1, 15, 13, 15),
			conflicts: vec![],
			uim_status: "active".to_string(),
			nms_status: "active".to_string(),
			utilization: 80,
			estimated_completion: ts(2024, 1, 15, 12, 0),
		},
	]
}
