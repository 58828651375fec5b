//! Built-in default dataset, used when there is no state file to load.

use crate::audit::AUDIT_TABLE;
use crate::record::{Record, Tables};
use serde_json::{json, Value};

/// Collection names the store knows about out of the box.
pub const DEFAULT_TABLES: &[&str] = &[
    "moradores",
    "avisos",
    "reservas",
    "ocorrencias",
    "usuarios",
    "empresas",
    "permissoes",
    AUDIT_TABLE,
];

/// Empty collections for a caller-supplied name set. The audit collection is
/// always present so mutations have somewhere to log to.
pub(crate) fn empty_tables<'a>(names: impl IntoIterator<Item = &'a str>) -> Tables {
    let mut tables = Tables::new();
    for name in names {
        tables.insert(name.to_string(), Vec::new());
    }
    tables.entry(AUDIT_TABLE.to_string()).or_default();
    tables
}

/// The default sample dataset: one record per collection, stamped `now`.
pub(crate) fn default_tables(now: &str) -> Tables {
    let mut tables = empty_tables(DEFAULT_TABLES.iter().copied());

    push(
        &mut tables,
        "moradores",
        json!({
            "id": 1,
            "nome": "João Silva",
            "apartamento": "101",
            "bloco": "A",
            "telefone": "(11) 99999-9999",
            "email": "joao@email.com",
            "dataEntrada": "2023-01-15",
            "ativo": true,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "avisos",
        json!({
            "id": 1,
            "titulo": "Manutenção do Elevador",
            "conteudo": "O elevador do bloco A passará por manutenção preventiva no dia 15/12/2023.",
            "dataInicio": "2023-12-10",
            "dataFim": "2023-12-20",
            "prioridade": "alta",
            "ativo": true,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "reservas",
        json!({
            "id": 1,
            "moradorId": 1,
            "espaco": "Salão de Festas",
            "dataReserva": "2023-12-25",
            "horarioInicio": "19:00",
            "horarioFim": "23:00",
            "status": "confirmada",
            "observacoes": "Festa de Natal",
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "ocorrencias",
        json!({
            "id": 1,
            "moradorId": 1,
            "tipo": "manutencao",
            "descricao": "Vazamento no banheiro",
            "prioridade": "alta",
            "status": "aberta",
            "dataOcorrencia": "2023-12-01",
            "dataResolucao": null,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "usuarios",
        json!({
            "id": 1,
            "nome": "Administrador",
            "email": "admin@evemind.com",
            "senha": "$2a$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi",
            "tipo": "admin",
            "ativo": true,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "empresas",
        json!({
            "id": 1,
            "nome": "Empresa de Limpeza ABC",
            "cnpj": "12.345.678/0001-90",
            "telefone": "(11) 3333-4444",
            "email": "contato@empresaabc.com",
            "servico": "Limpeza",
            "ativo": true,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        "permissoes",
        json!({
            "id": 1,
            "nome": "Gerenciar Moradores",
            "codigo": "MORADORES_CRUD",
            "descricao": "Permite criar, editar e excluir moradores",
            "ativo": true,
            "createdAt": now,
            "updatedAt": now,
        }),
    );
    push(
        &mut tables,
        AUDIT_TABLE,
        json!({
            "id": 1,
            "usuarioId": 1,
            "acao": "CREATE",
            "tabela": "moradores",
            "registroId": 1,
            "dadosAntigos": null,
            "dadosNovos": "{\"nome\":\"João Silva\",\"apartamento\":\"101\"}",
            "ip": "127.0.0.1",
            "userAgent": "Mozilla/5.0...",
            "createdAt": now,
        }),
    );

    tables
}

fn push(tables: &mut Tables, name: &str, value: Value) {
    let record = match value {
        Value::Object(map) => Record::new(map),
        _ => Record::default(),
    };
    if let Some(rows) = tables.get_mut(name) {
        rows.push(record);
    }
}
