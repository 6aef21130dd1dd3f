//! Static definition of the statement: eight sections in fixed order and
//! every category bound to its place in the form data tree.
//!
//! Repeatable categories (`Source::Entries`) and single-entry categories
//! backed by scalar fields (`Source::Scalars`) share one type, so the
//! builder and the renderers never special-case either shape.

use serde::Serialize;

use crate::money::ZeroPolicy;
use crate::tree::SubTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    FamilyData,
    Expenses,
    Income,
    Assets,
    Liabilities,
    AssetsTransferred,
    Fees,
    OtherCircumstances,
}

impl SectionId {
    pub const ORDER: [SectionId; 8] = [
        SectionId::FamilyData,
        SectionId::Expenses,
        SectionId::Income,
        SectionId::Assets,
        SectionId::Liabilities,
        SectionId::AssetsTransferred,
        SectionId::Fees,
        SectionId::OtherCircumstances,
    ];

    /// Stable key used by configuration tables.
    pub fn key(self) -> &'static str {
        match self {
            SectionId::FamilyData => "family_data",
            SectionId::Expenses => "expenses",
            SectionId::Income => "income",
            SectionId::Assets => "assets",
            SectionId::Liabilities => "liabilities",
            SectionId::AssetsTransferred => "assets_transferred",
            SectionId::Fees => "fees",
            SectionId::OtherCircumstances => "other_circumstances",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionId::FamilyData => "FAMILY DATA",
            SectionId::Expenses => "EXPENSES",
            SectionId::Income => "INCOME",
            SectionId::Assets => "ASSETS",
            SectionId::Liabilities => "LIABILITIES",
            SectionId::AssetsTransferred => "ASSETS TRANSFERRED",
            SectionId::Fees => "FEES",
            SectionId::OtherCircumstances => "OTHER CIRCUMSTANCES",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    /// Free-text court location, canonicalized by the builder.
    Jurisdiction,
    Money(ZeroPolicy),
}

#[derive(Debug)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef { key, label, kind: FieldKind::Text }
}

const fn date(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef { key, label, kind: FieldKind::Date }
}

/// Money field printed as `$0.00` when zero (itemized entries).
const fn amount(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef { key, label, kind: FieldKind::Money(ZeroPolicy::Show) }
}

/// Money field left blank when zero (optional scalar lines).
const fn line(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef { key, label, kind: FieldKind::Money(ZeroPolicy::Blank) }
}

#[derive(Debug)]
pub enum Source {
    /// An array of line-item entries under `key` in the sub-tree.
    Entries {
        key: &'static str,
        fields: &'static [FieldDef],
    },
    /// Fixed scalar fields of the sub-tree.
    Scalars { fields: &'static [FieldDef] },
}

/// Whether a category is totaled. Every totaled category adds into its
/// section's grand total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Totaling {
    /// Informational group: no total at all.
    None,
    Add,
    /// Totaled like `Add`, and also subtracted from gross income in the
    /// derived net income figure.
    Deduction,
}

#[derive(Debug)]
pub struct CategoryDef {
    pub id: &'static str,
    pub label: &'static str,
    pub subtree: SubTree,
    pub source: Source,
    pub totaling: Totaling,
}

impl CategoryDef {
    pub fn fields(&self) -> &'static [FieldDef] {
        match self.source {
            Source::Entries { fields, .. } | Source::Scalars { fields } => fields,
        }
    }

    /// The money fields whose sum is this category's total.
    pub fn money_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields()
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Money(_)))
    }

    pub fn is_totaled(&self) -> bool {
        self.totaling != Totaling::None
    }

    pub fn is_deduction(&self) -> bool {
        self.totaling == Totaling::Deduction
    }
}

#[derive(Debug)]
pub struct SectionDef {
    pub id: SectionId,
    pub categories: &'static [CategoryDef],
    pub grand_total: Option<&'static str>,
}

pub const TOTAL_ASSETS_LABEL: &str = "TOTAL ASSETS";
pub const TOTAL_LIABILITIES_LABEL: &str = "TOTAL LIABILITIES";
pub const TOTAL_INCOME_LABEL: &str = "TOTAL INCOME";

const fn entries(
    id: &'static str,
    label: &'static str,
    subtree: SubTree,
    key: &'static str,
    fields: &'static [FieldDef],
    totaling: Totaling,
) -> CategoryDef {
    CategoryDef { id, label, subtree, source: Source::Entries { key, fields }, totaling }
}

const fn scalars(
    id: &'static str,
    label: &'static str,
    subtree: SubTree,
    fields: &'static [FieldDef],
    totaling: Totaling,
) -> CategoryDef {
    CategoryDef { id, label, subtree, source: Source::Scalars { fields }, totaling }
}

use SubTree::{AdditionalSections, Assets, Expenses, FamilyData, Income, Liabilities};
use Totaling::{Add, Deduction};

const FAMILY: &[CategoryDef] = &[
    scalars(
        "case_information",
        "Case Information",
        FamilyData,
        &[
            FieldDef { key: "jurisdiction", label: "Judicial District", kind: FieldKind::Jurisdiction },
            text("docketNumber", "Docket Number"),
            text("plaintiff", "Plaintiff"),
            text("defendant", "Defendant"),
            text("filingParty", "Statement Filed By"),
        ],
        Totaling::None,
    ),
    scalars(
        "personal_information",
        "Personal Information",
        FamilyData,
        &[
            text("fullName", "Full Name"),
            text("address", "Residence Address"),
            date("dateOfBirth", "Date of Birth"),
            text("occupation", "Occupation"),
        ],
        Totaling::None,
    ),
    scalars(
        "marriage",
        "Marriage",
        FamilyData,
        &[
            date("dateOfMarriage", "Date of Marriage"),
            text("placeOfMarriage", "Place of Marriage"),
            date("dateOfSeparation", "Date of Separation"),
        ],
        Totaling::None,
    ),
    entries(
        "children",
        "Children",
        FamilyData,
        "children",
        &[
            text("name", "Name"),
            date("dateOfBirth", "Date of Birth"),
            text("residesWith", "Resides With"),
        ],
        Totaling::None,
    ),
];

const EXPENSES: &[CategoryDef] = &[
    scalars(
        "housing",
        "Housing",
        Expenses,
        &[
            line("rentOrMortgage", "Rent or Mortgage Payment"),
            line("propertyTaxes", "Real Estate Taxes"),
            line("homeownersInsurance", "Homeowner's or Renter's Insurance"),
            line("condoFees", "Condominium or Association Fees"),
        ],
        Add,
    ),
    scalars(
        "utilities",
        "Utilities",
        Expenses,
        &[
            line("electricity", "Electricity"),
            line("heatingFuel", "Heating Fuel or Gas"),
            line("water", "Water and Sewer"),
            line("telephone", "Telephone"),
            line("internet", "Internet and Cable"),
        ],
        Add,
    ),
    scalars(
        "food_household",
        "Food & Household",
        Expenses,
        &[
            line("groceries", "Groceries"),
            line("diningOut", "Meals Outside the Home"),
            line("householdSupplies", "Household Supplies"),
        ],
        Add,
    ),
    scalars(
        "transportation",
        "Transportation",
        Expenses,
        &[
            line("vehiclePayment", "Vehicle Loan or Lease Payment"),
            line("vehicleInsurance", "Vehicle Insurance"),
            line("fuel", "Fuel"),
            line("vehicleMaintenance", "Vehicle Maintenance"),
            line("publicTransit", "Public Transportation"),
        ],
        Add,
    ),
    scalars(
        "insurance",
        "Insurance",
        Expenses,
        &[
            line("healthInsurance", "Health Insurance"),
            line("dentalInsurance", "Dental Insurance"),
            line("lifeInsurance", "Life Insurance"),
            line("disabilityInsurance", "Disability Insurance"),
        ],
        Add,
    ),
    scalars(
        "medical_dental",
        "Medical & Dental",
        Expenses,
        &[
            line("unreimbursedMedical", "Unreimbursed Medical"),
            line("prescriptions", "Prescriptions"),
            line("counseling", "Counseling and Therapy"),
        ],
        Add,
    ),
    scalars(
        "childrens_expenses",
        "Children's Expenses",
        Expenses,
        &[
            line("childcare", "Child Care"),
            line("tuition", "School Tuition and Supplies"),
            line("activities", "Extracurricular Activities"),
            line("childSupportPaid", "Child Support Paid"),
        ],
        Add,
    ),
    scalars(
        "clothing_personal",
        "Clothing & Personal Care",
        Expenses,
        &[
            line("clothing", "Clothing"),
            line("personalCare", "Personal Care"),
            line("laundry", "Laundry and Dry Cleaning"),
        ],
        Add,
    ),
    entries(
        "other_expenses",
        "Other Expenses",
        Expenses,
        "otherExpenses",
        &[text("description", "Description"), amount("amount", "Amount")],
        Add,
    ),
];

const INCOME: &[CategoryDef] = &[
    entries(
        "employment_income",
        "Employment Income",
        Income,
        "employers",
        &[
            text("employer", "Employer"),
            text("position", "Position"),
            amount("grossAmount", "Gross Income"),
        ],
        Add,
    ),
    entries(
        "self_employment_income",
        "Self-Employment Income",
        Income,
        "selfEmployment",
        &[text("business", "Business"), amount("netAmount", "Net Income")],
        Add,
    ),
    entries(
        "other_income",
        "Other Income",
        Income,
        "otherIncome",
        &[text("source", "Source"), amount("amount", "Amount")],
        Add,
    ),
    scalars(
        "mandatory_deductions",
        "Mandatory Deductions",
        Income,
        &[
            line("federalIncomeTax", "Federal Income Tax"),
            line("stateIncomeTax", "State Income Tax"),
            line("socialSecurity", "Social Security"),
            line("medicare", "Medicare"),
            line("unionDues", "Mandatory Union Dues"),
            line("mandatoryRetirement", "Mandatory Retirement"),
            line("healthInsuranceDeduction", "Health Insurance Premium"),
        ],
        Deduction,
    ),
];

const ASSETS: &[CategoryDef] = &[
    entries(
        "real_estate",
        "Real Estate",
        Assets,
        "realEstate",
        &[
            text("address", "Property Address"),
            text("titleHeldIn", "Title Held In"),
            amount("currentValue", "Fair Market Value"),
        ],
        Add,
    ),
    entries(
        "motor_vehicles",
        "Motor Vehicles",
        Assets,
        "vehicles",
        &[
            text("yearMakeModel", "Year, Make and Model"),
            text("titleHeldIn", "Title Held In"),
            amount("currentValue", "Fair Market Value"),
        ],
        Add,
    ),
    entries(
        "checking_accounts",
        "Checking Accounts",
        Assets,
        "checkingAccounts",
        &[
            text("institution", "Institution"),
            text("lastFourDigits", "Account Ending In"),
            amount("balance", "Balance"),
        ],
        Add,
    ),
    entries(
        "savings_accounts",
        "Savings Accounts",
        Assets,
        "savingsAccounts",
        &[
            text("institution", "Institution"),
            text("lastFourDigits", "Account Ending In"),
            amount("balance", "Balance"),
        ],
        Add,
    ),
    entries(
        "retirement_accounts",
        "Retirement Accounts",
        Assets,
        "retirementAccounts",
        &[
            text("plan", "Plan"),
            text("custodian", "Custodian"),
            amount("currentValue", "Current Value"),
        ],
        Add,
    ),
    entries(
        "investments",
        "Stocks, Bonds & Investments",
        Assets,
        "investments",
        &[text("description", "Description"), amount("currentValue", "Current Value")],
        Add,
    ),
    entries(
        "life_insurance",
        "Life Insurance Cash Value",
        Assets,
        "lifeInsurance",
        &[
            text("insurer", "Insurer"),
            text("policyOwner", "Policy Owner"),
            amount("cashValue", "Cash Surrender Value"),
        ],
        Add,
    ),
    entries(
        "business_interests",
        "Business Interests",
        Assets,
        "businessInterests",
        &[
            text("name", "Business Name"),
            text("ownershipPercent", "Percentage Owned"),
            amount("currentValue", "Value of Interest"),
        ],
        Add,
    ),
    scalars("cash", "Cash", Assets, &[amount("cashOnHand", "Cash on Hand")], Add),
    scalars(
        "personal_property",
        "Personal Property",
        Assets,
        &[
            line("furniture", "Furniture and Furnishings"),
            line("jewelry", "Jewelry"),
            line("collectibles", "Art and Collectibles"),
        ],
        Add,
    ),
    entries(
        "other_assets",
        "Other Assets",
        Assets,
        "otherAssets",
        &[text("description", "Description"), amount("currentValue", "Current Value")],
        Add,
    ),
];

const LIABILITIES: &[CategoryDef] = &[
    entries(
        "mortgages",
        "Mortgages",
        Liabilities,
        "mortgages",
        &[
            text("lender", "Lender"),
            text("property", "Property"),
            amount("currentDebt", "Balance Owed"),
        ],
        Add,
    ),
    entries(
        "credit_cards",
        "Credit Card Debt",
        Liabilities,
        "creditCards",
        &[
            text("creditor", "Creditor"),
            text("lastFourDigits", "Account Ending In"),
            amount("currentDebt", "Balance Owed"),
        ],
        Add,
    ),
    entries(
        "vehicle_loans",
        "Vehicle Loans",
        Liabilities,
        "vehicleLoans",
        &[
            text("lender", "Lender"),
            text("vehicle", "Vehicle"),
            amount("currentDebt", "Balance Owed"),
        ],
        Add,
    ),
    entries(
        "student_loans",
        "Student Loans",
        Liabilities,
        "studentLoans",
        &[text("lender", "Lender"), amount("currentDebt", "Balance Owed")],
        Add,
    ),
    entries(
        "personal_loans",
        "Personal Loans",
        Liabilities,
        "personalLoans",
        &[
            text("lender", "Lender"),
            text("relationship", "Relationship to Lender"),
            amount("currentDebt", "Balance Owed"),
        ],
        Add,
    ),
    scalars(
        "taxes_owed",
        "Taxes Owed",
        Liabilities,
        &[
            line("federalTaxesOwed", "Federal Taxes"),
            line("stateTaxesOwed", "State Taxes"),
            line("propertyTaxesOwed", "Property Taxes"),
        ],
        Add,
    ),
    entries(
        "other_liabilities",
        "Other Liabilities",
        Liabilities,
        "otherLiabilities",
        &[
            text("creditor", "Creditor"),
            text("description", "Description"),
            amount("currentDebt", "Balance Owed"),
        ],
        Add,
    ),
];

const TRANSFERS: &[CategoryDef] = &[entries(
    "assets_transferred",
    "Transfers",
    AdditionalSections,
    "assetsTransferred",
    &[
        text("recipient", "Transferred To"),
        text("description", "Description of Asset"),
        date("dateTransferred", "Date of Transfer"),
        amount("value", "Value"),
    ],
    Add,
)];

const FEES: &[CategoryDef] = &[
    entries(
        "attorney_fees",
        "Attorney Fees Paid",
        AdditionalSections,
        "attorneyFees",
        &[
            text("payee", "Paid To"),
            text("sourceOfFunds", "Source of Funds"),
            amount("amount", "Amount"),
        ],
        Add,
    ),
    entries(
        "expert_fees",
        "Expert & Appraisal Fees Paid",
        AdditionalSections,
        "expertFees",
        &[
            text("payee", "Paid To"),
            text("purpose", "Purpose"),
            amount("amount", "Amount"),
        ],
        Add,
    ),
];

const CIRCUMSTANCES: &[CategoryDef] = &[scalars(
    "other_circumstances",
    "Statement",
    AdditionalSections,
    &[text("otherCircumstances", "Other Circumstances")],
    Totaling::None,
)];

pub static SECTIONS: [SectionDef; 8] = [
    SectionDef { id: SectionId::FamilyData, categories: FAMILY, grand_total: None },
    SectionDef { id: SectionId::Expenses, categories: EXPENSES, grand_total: Some("TOTAL EXPENSES") },
    SectionDef { id: SectionId::Income, categories: INCOME, grand_total: Some(TOTAL_INCOME_LABEL) },
    SectionDef { id: SectionId::Assets, categories: ASSETS, grand_total: Some(TOTAL_ASSETS_LABEL) },
    SectionDef {
        id: SectionId::Liabilities,
        categories: LIABILITIES,
        grand_total: Some(TOTAL_LIABILITIES_LABEL),
    },
    SectionDef {
        id: SectionId::AssetsTransferred,
        categories: TRANSFERS,
        grand_total: Some("TOTAL ASSETS TRANSFERRED"),
    },
    SectionDef { id: SectionId::Fees, categories: FEES, grand_total: Some("TOTAL FEES PAID") },
    SectionDef { id: SectionId::OtherCircumstances, categories: CIRCUMSTANCES, grand_total: None },
];

pub fn section(id: SectionId) -> &'static SectionDef {
    // SECTIONS is declared in SectionId::ORDER
    let idx = SectionId::ORDER.iter().position(|&s| s == id).unwrap_or(0);
    &SECTIONS[idx]
}

pub fn category(id: &str) -> Option<(&'static SectionDef, &'static CategoryDef)> {
    SECTIONS
        .iter()
        .flat_map(|s| s.categories.iter().map(move |c| (s, c)))
        .find(|(_, c)| c.id == id)
}

/// Official names of the judicial districts, used to canonicalize the
/// free-text jurisdiction field.
pub const JURISDICTIONS: &[&str] = &[
    "Ansonia-Milford",
    "Danbury",
    "Fairfield at Bridgeport",
    "Hartford",
    "Litchfield at Torrington",
    "Middlesex at Middletown",
    "New Britain",
    "New Haven",
    "New London",
    "Stamford-Norwalk",
    "Tolland at Rockville",
    "Waterbury",
    "Windham at Putnam",
];
