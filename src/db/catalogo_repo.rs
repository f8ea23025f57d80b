use sqlx::PgPool;

use crate::{common::error::AppError, models::catalogo::ItemCatalogo};

// Repositório único para as três tabelas de catálogo (marcas, tamanhos e
// tipos de peça): mesmo formato, mesmas operações. A tabela é fixada na
// construção, então nunca entra texto do cliente no SQL.
#[derive(Clone)]
pub struct CatalogoRepository {
    pool: PgPool,
    tabela: &'static str,
    rotulo: &'static str,
}

impl CatalogoRepository {
    pub fn marcas(pool: PgPool) -> Self {
        Self { pool, tabela: "marcas", rotulo: "Marca" }
    }

    pub fn tamanhos(pool: PgPool) -> Self {
        Self { pool, tabela: "tamanhos", rotulo: "Tamanho" }
    }

    pub fn tipos_peca(pool: PgPool) -> Self {
        Self { pool, tabela: "tipos_peca", rotulo: "Tipo de peça" }
    }

    pub async fn listar(&self) -> Result<Vec<ItemCatalogo>, AppError> {
        let sql = format!("SELECT * FROM {} ORDER BY nome ASC", self.tabela);
        let itens = sqlx::query_as::<_, ItemCatalogo>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(itens)
    }

    pub async fn criar(&self, nome: &str) -> Result<ItemCatalogo, AppError> {
        let sql = format!("INSERT INTO {} (nome) VALUES ($1) RETURNING *", self.tabela);
        sqlx::query_as::<_, ItemCatalogo>(&sql)
            .bind(nome)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::DuplicateKey("nome");
                    }
                }
                e.into()
            })
    }

    pub async fn atualizar(
        &self,
        id: i32,
        nome: Option<&str>,
        ativo: Option<bool>,
    ) -> Result<ItemCatalogo, AppError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                nome = COALESCE($2, nome),
                ativo = COALESCE($3, ativo)
            WHERE id = $1
            RETURNING *
            "#,
            self.tabela
        );
        sqlx::query_as::<_, ItemCatalogo>(&sql)
            .bind(id)
            .bind(nome)
            .bind(ativo)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::DuplicateKey("nome");
                    }
                }
                AppError::from(e)
            })?
            .ok_or(AppError::NotFound(self.rotulo))
    }

    pub async fn deletar(&self, id: i32) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.tabela);
        let resultado = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ReferentialConflict(format!(
                            "Não é possível deletar: existem peças usando esta entrada de {}",
                            self.tabela
                        ));
                    }
                }
                AppError::from(e)
            })?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::NotFound(self.rotulo));
        }
        Ok(())
    }
}
