use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{TipoUsuario, Usuario},
};

#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn buscar_por_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn listar_admins(&self) -> Result<Vec<Usuario>, AppError> {
        let admins = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE tipo = 'admin' ORDER BY criado_em DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    // Aceita um executor genérico para poder rodar dentro da transação que
    // também cria o parceiro.
    pub async fn criar<'e, E>(
        &self,
        executor: E,
        nome: &str,
        email: &str,
        senha_hash: &str,
        tipo: TipoUsuario,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome, email, senha, tipo)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(tipo)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateKey("e-mail");
                }
            }
            e.into()
        })
    }

    /// Atualização parcial: argumento `None` deixa a coluna como está.
    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: i32,
        nome: Option<&str>,
        email: Option<&str>,
        senha_hash: Option<&str>,
        ativo: Option<bool>,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nome = COALESCE($2, nome),
                email = COALESCE($3, email),
                senha = COALESCE($4, senha),
                ativo = COALESCE($5, ativo)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(ativo)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateKey("e-mail");
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Usuário"))
    }

    pub async fn contar_admins_ativos_exceto(&self, id: i32) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM usuarios WHERE tipo = 'admin' AND ativo AND id <> $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn deletar<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(mapear_erro_delecao)?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::NotFound("Usuário"));
        }
        Ok(())
    }
}

// Usuário ainda referenciado por um parceiro não pode ser removido.
fn mapear_erro_delecao(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::ReferentialConflict(
                "Não é possível deletar: usuário está vinculado a um parceiro".into(),
            );
        }
    }
    AppError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct ViolacaoFk;

    impl fmt::Display for ViolacaoFk {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "viola a chave estrangeira \"parceiros_usuario_id_fkey\"")
        }
    }

    impl StdError for ViolacaoFk {}

    impl DatabaseError for ViolacaoFk {
        fn message(&self) -> &str {
            "viola a chave estrangeira \"parceiros_usuario_id_fkey\""
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::ForeignKeyViolation
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn delecao_bloqueada_por_parceiro_vira_conflito_referencial() {
        let erro = mapear_erro_delecao(sqlx::Error::Database(Box::new(ViolacaoFk)));
        assert!(matches!(erro, AppError::ReferentialConflict(_)));
    }

    #[test]
    fn outros_erros_de_banco_nao_sao_mascarados() {
        let erro = mapear_erro_delecao(sqlx::Error::RowNotFound);
        assert!(matches!(erro, AppError::DatabaseError(_)));
    }
}
