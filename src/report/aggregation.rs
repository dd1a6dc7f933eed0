//! Turns ledger entries into totals and dense series.
//!
//! Everything here is a pure function over entries that have already been
//! filtered to the report's window. Amounts are summed with saturating
//! arithmetic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    CategoryId, LocalTimezone,
    category::{Category, CategoryName},
    report::{LedgerEntry, days_in_month},
    transaction::TransactionType,
};

/// The summed income and expenses of a set of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// The sum of all incomes.
    pub income: i64,
    /// The sum of all expenses.
    pub expense: i64,
}

impl Totals {
    fn add(&mut self, entry: &LedgerEntry) {
        match entry.transaction_type {
            TransactionType::Income => self.income = self.income.saturating_add(entry.amount),
            TransactionType::Expense => self.expense = self.expense.saturating_add(entry.amount),
        }
    }
}

/// The income and expense totals and counts of a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The name of the category.
    pub category_name: CategoryName,
    /// The sum of the incomes in the category.
    pub total_income: i64,
    /// The sum of the expenses in the category.
    pub total_expense: i64,
    /// How many incomes are in the category.
    pub income_count: u64,
    /// How many expenses are in the category.
    pub expense_count: u64,
}

impl CategoryTotals {
    fn empty(category: &Category) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name.clone(),
            total_income: 0,
            total_expense: 0,
            income_count: 0,
            expense_count: 0,
        }
    }

    fn add(&mut self, entry: &LedgerEntry) {
        match entry.transaction_type {
            TransactionType::Income => {
                self.total_income = self.total_income.saturating_add(entry.amount);
                self.income_count += 1;
            }
            TransactionType::Expense => {
                self.total_expense = self.total_expense.saturating_add(entry.amount);
                self.expense_count += 1;
            }
        }
    }
}

/// The total of one transaction type within a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTypeTotal {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The name of the category.
    pub category_name: CategoryName,
    /// The sum of the transactions.
    pub total: i64,
    /// How many transactions were summed.
    pub transaction_count: u64,
}

/// The income and expense totals of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// The month number, 1 = January.
    pub month: u8,
    /// The sum of the incomes in the month.
    pub income: i64,
    /// The sum of the expenses in the month.
    pub expense: i64,
}

/// The income and expense totals of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// The day of the month, starting at 1.
    pub day: u8,
    /// The sum of the incomes on the day.
    pub income: i64,
    /// The sum of the expenses on the day.
    pub expense: i64,
}

/// Sum the incomes and expenses.
pub fn sum_totals(entries: &[LedgerEntry]) -> Totals {
    entries.iter().fold(Totals::default(), |mut totals, entry| {
        totals.add(entry);
        totals
    })
}

/// Compute the totals for every category in `categories`.
///
/// Categories without entries are reported with zeros, and entries that refer
/// to a category not in `categories` are ignored. The result is sorted by
/// category name, then ID.
pub fn totals_by_category(categories: &[Category], entries: &[LedgerEntry]) -> Vec<CategoryTotals> {
    let mut totals: HashMap<CategoryId, CategoryTotals> = categories
        .iter()
        .map(|category| (category.id, CategoryTotals::empty(category)))
        .collect();

    for entry in entries {
        if let Some(category_totals) = totals.get_mut(&entry.category_id) {
            category_totals.add(entry);
        }
    }

    let mut totals: Vec<_> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        a.category_name
            .cmp(&b.category_name)
            .then(a.category_id.cmp(&b.category_id))
    });

    totals
}

/// Compute the total of `transaction_type` for each category that has at
/// least one such entry.
///
/// Entries whose category is not in `categories` are dropped. The result is
/// sorted by descending total, then by category name and ID.
pub fn totals_for_type(
    categories: &HashMap<CategoryId, Category>,
    entries: &[LedgerEntry],
    transaction_type: TransactionType,
) -> Vec<CategoryTypeTotal> {
    let mut totals: HashMap<CategoryId, CategoryTypeTotal> = HashMap::new();

    for entry in entries
        .iter()
        .filter(|entry| entry.transaction_type == transaction_type)
    {
        let Some(category) = categories.get(&entry.category_id) else {
            continue;
        };

        let category_total = totals
            .entry(category.id)
            .or_insert_with(|| CategoryTypeTotal {
                category_id: category.id,
                category_name: category.name.clone(),
                total: 0,
                transaction_count: 0,
            });
        category_total.total = category_total.total.saturating_add(entry.amount);
        category_total.transaction_count += 1;
    }

    let mut totals: Vec<_> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
            .then(a.category_id.cmp(&b.category_id))
    });

    totals
}

/// Compute the totals of each month of `year`, always returning 12 entries.
///
/// Entries are bucketed by their month on the local calendar. Entries from
/// other years are ignored.
pub fn monthly_totals(
    entries: &[LedgerEntry],
    year: i32,
    timezone: &LocalTimezone,
) -> Vec<MonthlyTotals> {
    let mut buckets = [Totals::default(); 12];

    for entry in entries {
        let local_date = timezone.to_local(entry.date).date();

        if local_date.year() == year {
            buckets[usize::from(u8::from(local_date.month())) - 1].add(entry);
        }
    }

    buckets
        .iter()
        .zip(1..)
        .map(|(totals, month)| MonthlyTotals {
            month,
            income: totals.income,
            expense: totals.expense,
        })
        .collect()
}

/// Compute the totals of each day of `month` in `year`, returning one entry
/// for every day of the month.
///
/// Entries are bucketed by their day on the local calendar. Entries from
/// other months are ignored.
pub fn daily_totals(
    entries: &[LedgerEntry],
    year: i32,
    month: Month,
    timezone: &LocalTimezone,
) -> Vec<DailyTotals> {
    let mut buckets = vec![Totals::default(); usize::from(days_in_month(year, month))];

    for entry in entries {
        let local_date = timezone.to_local(entry.date).date();

        if local_date.year() == year && local_date.month() == month {
            if let Some(bucket) = buckets.get_mut(usize::from(local_date.day()) - 1) {
                bucket.add(entry);
            }
        }
    }

    buckets
        .iter()
        .zip(1..)
        .map(|(totals, day)| DailyTotals {
            day,
            income: totals.income,
            expense: totals.expense,
        })
        .collect()
}
