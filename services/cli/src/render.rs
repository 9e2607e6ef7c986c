use jobtrack::tracker::applications::{ApplicationRecord, StatisticsSnapshot};
use jobtrack::tracker::funnel::StageGroup;
use jobtrack::tracker::stats::StageTotals;

pub(crate) fn application_list(records: &[ApplicationRecord]) {
    if records.is_empty() {
        println!("No applications found.");
        return;
    }

    println!("{} application(s)", records.len());
    for record in records {
        application(record);
    }
}

pub(crate) fn application(record: &ApplicationRecord) {
    println!(
        "- {} [{}] {} / {}",
        record.id,
        record.stage().label(),
        record.company,
        record.position
    );
    println!(
        "  applied {} | status {}",
        record.date_applied, record.status
    );
    if let Some(notes) = &record.notes {
        println!("  notes: {notes}");
    }
}

pub(crate) fn application_detail(record: &ApplicationRecord) {
    let stage = record.stage();
    println!("Application {}", record.id);
    println!("- company: {}", record.company);
    println!("- position: {}", record.position);
    println!("- date applied: {}", record.date_applied);
    println!("- status: {}", record.status);
    println!("- stage: {} ({})", stage.label(), stage.tag());
    match &record.notes {
        Some(notes) => println!("- notes: {notes}"),
        None => println!("- notes: none"),
    }
}

pub(crate) fn funnel(snapshot: &StatisticsSnapshot, totals: &StageTotals) {
    println!("Application funnel");
    println!("- Total applications: {}", snapshot.total_applications);
    for group in StageGroup::ordered() {
        println!("- {}: {}", group.label(), totals.group_total(group));
    }
    println!("- Unclassified: {}", totals.unclassified);

    if !totals.matches_reported_total(snapshot.total_applications) {
        println!(
            "Status counts add up to {}, not the reported total.",
            totals.total
        );
    }
}
