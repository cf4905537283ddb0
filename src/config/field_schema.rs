// ==========================================
// Wood QC Report - Field schema table
// ==========================================
// Responsibility: canonical field → candidate column spellings, in priority order
// Spreadsheet headers drift (accents, abbreviations, units); the resolver reads
// this table instead of hard-coding spellings at call sites.
// ==========================================

use crate::domain::{CanonicalField, Compound, REPLICATES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    entries: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::default_table()
    }
}

impl FieldSchema {
    /// Empty table; every field resolves to nothing.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Column spellings used by the laboratory's "Madeira Tratada" sheet.
    pub fn default_table() -> Self {
        use CanonicalField::*;

        let mut schema = Self::empty()
            .with_candidates(EntryDate, &["Data de entrada", "Entrada", "Data Entrada"])
            .with_candidates(
                IssueDate,
                &["Data de Registro", "Fim da análise", "Fim da analise", "Data de Emissão"],
            )
            .with_candidates(SampleId, &["Código UFV", "Codigo UFV", "Número ID", "Numero ID"])
            .with_candidates(ClientName, &["Nome do Cliente", "Cliente"])
            .with_candidates(City, &["Cidade"])
            .with_candidates(State, &["Estado"])
            .with_candidates(Email, &["E-mail", "Email"])
            .with_candidates(
                ClientReference,
                &[
                    "Indentificação de Amostra",
                    "Identificação de Amostra",
                    "Identificacao de Amostra",
                    "Ref. Cliente",
                ],
            )
            .with_candidates(Wood, &["Madeira", "Espécie", "Especie"])
            .with_candidates(Product, &["Produto", "Preservativo"])
            .with_candidates(Application, &["Aplicação", "Aplicacao", "Finalidade"])
            .with_candidates(Standard, &["Norma ABNT", "Norma"])
            .with_candidates(
                DeclaredRetention,
                &[
                    "Retenção Especificada",
                    "Retenção Esp.",
                    "Retenção Mínima",
                    "Retencao Minima",
                    "=Retenção",
                    "=Retencao",
                ],
            )
            .with_candidates(
                CompoundPercent(Compound::Chromium),
                &["Cromo (%)", "Cromo %", "% Cromo", "Teor de Cromo", "CrO3 (%)", "CrO3"],
            )
            .with_candidates(
                CompoundPercent(Compound::Copper),
                &["Cobre (%)", "Cobre %", "% Cobre", "Teor de Cobre", "CuO (%)", "CuO"],
            )
            .with_candidates(
                CompoundPercent(Compound::Arsenic),
                &[
                    "Arsênio (%)",
                    "Arsenio (%)",
                    "Arsênio %",
                    "Arsenio %",
                    "% Arsênio",
                    "Teor de Arsênio",
                    "As2O5 (%)",
                    "As2O5",
                ],
            )
            .with_candidates(Grade, &["Grau", "Grau de Penetração", "Classe de Penetração"])
            .with_candidates(
                GradeType,
                &["Descrição do Grau", "Descricao do Grau", "Grau Descricao", "Descrição Grau"],
            )
            .with_candidates(
                PenetrationDescription,
                &["Descrição Penetração", "Descricao Penetracao", "Descrição da Penetração"],
            )
            .with_candidates(Observation, &["Observação", "Observações", "Observacao", "Obs"]);

        for i in 1..=REPLICATES {
            schema = schema
                .with_candidates(
                    Diameter(i),
                    &[
                        format!("Diâmetro {}", i),
                        format!("Diametro {}", i),
                        format!("Diâm. {}", i),
                        format!("Diam. {}", i),
                    ],
                )
                .with_candidates(
                    Length(i),
                    &[format!("Comprimento {}", i), format!("Comp. {}", i)],
                )
                .with_candidates(Mass(i), &[format!("Massa {}", i), format!("Peso {}", i)]);
        }

        schema
    }

    pub fn with_candidates<S: AsRef<str>>(mut self, field: CanonicalField, candidates: &[S]) -> Self {
        self.set_candidates(field, candidates.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn set_candidates(&mut self, field: CanonicalField, candidates: Vec<String>) {
        self.entries.insert(field, candidates);
    }

    /// Candidate spellings for a field; empty when the table has no entry.
    pub fn candidates(&self, field: CanonicalField) -> &[String] {
        self.entries.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.keys().copied()
    }

    /// Replace the candidate lists of the fields present in `overrides`.
    pub fn merge(&mut self, overrides: FieldSchema) {
        for (field, candidates) in overrides.entries {
            self.entries.insert(field, candidates);
        }
    }
}
